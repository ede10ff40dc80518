// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon startup and initialization logic.

use tokio::net::TcpListener;
use tracing::{info, warn};
use x2a_adapters::{JobSubmitter, KubeJobSubmitter};
use x2a_core::{Clock, SystemClock};

use crate::listener::AppState;

use super::{app_state, Config, DeploymentProfile, LifecycleError};

/// Result of daemon startup: request state plus the bound listener.
pub struct StartupResult {
    pub state: AppState<KubeJobSubmitter, SystemClock>,
    pub listener: TcpListener,
}

/// Start the daemon
pub async fn startup(config: &Config) -> Result<StartupResult, LifecycleError> {
    // 1. State directory holds the ledger and the log
    std::fs::create_dir_all(&config.state_dir)?;

    if config.profile == DeploymentProfile::Callback && config.callback_url.is_none() {
        warn!("X2A_CALLBACK_URL is not set; workloads will not report completion");
    }
    if config.profile == DeploymentProfile::Minimal && config.inline_credentials.is_empty() {
        warn!("minimal profile with no credentials in the environment");
    }

    // 2. Substrate client
    let submitter = KubeJobSubmitter::connect(config.namespace.clone()).await?;

    // 3. Ledger + launcher
    let state = app_state(config, submitter, SystemClock)?;
    let entries = ledger_entries(&state).await;

    // 4. HTTP listener
    let listener = TcpListener::bind(config.listen_addr)
        .await
        .map_err(|e| LifecycleError::BindFailed(config.listen_addr, e))?;

    info!(
        addr = %config.listen_addr,
        namespace = %config.namespace,
        profile = %config.profile,
        ledger = %config.ledger_path.display(),
        entries = ?entries,
        "x2ad ready"
    );

    Ok(StartupResult { state, listener })
}

/// Entry count for the ready log; `None` if the ledger could not be read.
async fn ledger_entries<S, C>(state: &AppState<S, C>) -> Option<usize>
where
    S: JobSubmitter,
    C: Clock + 'static,
{
    match state.artifacts().count().await {
        Ok(count) => Some(count),
        Err(e) => {
            warn!(error = %e, "failed to read artifact ledger at startup");
            None
        }
    }
}

#[cfg(test)]
#[path = "startup_tests.rs"]
mod tests;
