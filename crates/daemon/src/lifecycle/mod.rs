// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle: configuration and startup.

mod startup;
pub use startup::{startup, StartupResult};

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;
use x2a_adapters::job::CALLBACK_SECRET_KEY;
use x2a_adapters::{CallbackTarget, Credentials, JobSubmitter, SecretKeyRef, SubmitError};
use x2a_core::Clock;
use x2a_storage::{Ledger, LedgerError};

use crate::artifacts::ArtifactService;
use crate::env;
use crate::launcher::{JobLauncher, LaunchSettings};
use crate::listener::AppState;

/// How workloads are wired.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeploymentProfile {
    /// Credentials from `secretKeyRef`s; the command is wrapped to report
    /// completion back to the daemon.
    #[default]
    Callback,
    /// Credentials written inline from the daemon's environment; the command
    /// runs bare and never reports back.
    Minimal,
}

impl DeploymentProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentProfile::Callback => "callback",
            DeploymentProfile::Minimal => "minimal",
        }
    }
}

impl fmt::Display for DeploymentProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeploymentProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "callback" => Ok(DeploymentProfile::Callback),
            "minimal" => Ok(DeploymentProfile::Minimal),
            other => Err(format!("unknown profile {other:?}, expected callback or minimal")),
        }
    }
}

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Root state directory (e.g. ~/.local/state/x2a)
    pub state_dir: PathBuf,
    /// Path to the artifact ledger
    pub ledger_path: PathBuf,
    /// Path to daemon log file
    pub log_path: PathBuf,
    pub listen_addr: SocketAddr,
    pub namespace: String,
    pub image: String,
    pub profile: DeploymentProfile,
    pub callback_url: Option<String>,
    pub callback_secret: Option<String>,
    /// Key in `secret_name` that workloads read the callback secret from
    pub callback_secret_key: String,
    /// Secret holding workload credentials (callback profile)
    pub secret_name: String,
    /// Secret mounted read-only into every workload
    pub config_secret: String,
    pub disambiguate_names: bool,
    /// Credential values captured at load time (minimal profile)
    pub inline_credentials: Vec<(String, String)>,
}

impl Config {
    /// Load configuration from the environment.
    pub fn load() -> Result<Self, LifecycleError> {
        let mut config = Self::with_state_dir(env::state_dir()?);
        config.listen_addr = env::listen_addr()?;
        config.namespace = env::k8s_namespace();
        config.image = env::job_image();
        config.profile = env::profile()?;
        config.callback_url = env::callback_url();
        config.callback_secret = env::callback_secret();
        config.callback_secret_key = env::callback_secret_key();
        config.secret_name = env::secret_name();
        config.config_secret = env::config_secret();
        config.disambiguate_names = env::disambiguate_names();
        if config.profile == DeploymentProfile::Minimal {
            config.inline_credentials = env::inline_credentials();
        }
        Ok(config)
    }

    /// Defaults rooted at `state_dir`, ignoring the environment.
    pub fn with_state_dir(state_dir: impl Into<PathBuf>) -> Self {
        let state_dir = state_dir.into();
        Self {
            ledger_path: state_dir.join("artifacts.jsonl"),
            log_path: state_dir.join("x2ad.log"),
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 7007)),
            namespace: env::DEFAULT_NAMESPACE.to_string(),
            image: env::DEFAULT_JOB_IMAGE.to_string(),
            profile: DeploymentProfile::default(),
            callback_url: None,
            callback_secret: None,
            callback_secret_key: CALLBACK_SECRET_KEY.to_string(),
            secret_name: env::DEFAULT_SECRET_NAME.to_string(),
            config_secret: env::DEFAULT_CONFIG_SECRET.to_string(),
            disambiguate_names: false,
            inline_credentials: Vec::new(),
            state_dir,
        }
    }

    /// Launcher settings for this configuration.
    pub fn launch_settings(&self) -> LaunchSettings {
        let (callback, credentials) = match self.profile {
            DeploymentProfile::Callback => (
                self.callback_url.as_ref().map(|url| CallbackTarget {
                    url: url.clone(),
                    secret: self.callback_secret.as_ref().map(|_| SecretKeyRef {
                        secret_name: self.secret_name.clone(),
                        key: self.callback_secret_key.clone(),
                    }),
                }),
                Credentials::SecretRefs { secret_name: self.secret_name.clone() },
            ),
            DeploymentProfile::Minimal => {
                (None, Credentials::Inline(self.inline_credentials.clone()))
            }
        };
        LaunchSettings {
            namespace: self.namespace.clone(),
            image: self.image.clone(),
            profile: self.profile,
            callback,
            credentials,
            config_secret: self.config_secret.clone(),
            disambiguate_names: self.disambiguate_names,
        }
    }
}

/// Wire the request-handling state from `config` and a substrate.
pub fn app_state<S, C>(
    config: &Config,
    submitter: S,
    clock: C,
) -> Result<AppState<S, C>, LifecycleError>
where
    S: JobSubmitter,
    C: Clock + 'static,
{
    let ledger = Ledger::with_clock(&config.ledger_path, clock.clone())?;
    let launcher = JobLauncher::new(config.launch_settings(), submitter, clock);
    Ok(AppState::new(launcher, ArtifactService::new(ledger), config.callback_secret.clone()))
}

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Could not determine state directory")]
    NoStateDir,

    #[error("Invalid {var}: {message}")]
    InvalidConfig { var: &'static str, message: String },

    #[error("Failed to bind {0}: {1}")]
    BindFailed(SocketAddr, #[source] std::io::Error),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Kubernetes error: {0}")]
    Substrate(#[from] SubmitError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
