// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP listener: job creation, completion callbacks, artifact queries.
//!
//! | route                          | handler            |
//! |--------------------------------|--------------------|
//! | `GET /health`                  | `health`           |
//! | `POST /api/jobs`               | `create_job`       |
//! | `POST /api/collectArtifacts`   | `collect_artifacts`|
//! | `GET /api/artifacts`           | `list_artifacts`   |
//! | `GET /api/artifacts/{jobName}` | `get_artifact`     |
//! | `DELETE /api/artifacts`        | `clear_artifacts`  |

mod artifacts;
mod error;
mod health;
mod jobs;

pub use error::ApiError;
pub use health::HealthResponse;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;
use x2a_adapters::JobSubmitter;
use x2a_core::Clock;

use crate::artifacts::ArtifactService;
use crate::launcher::JobLauncher;

/// Shared state for request handlers.
#[derive(Clone)]
pub struct AppState<S, C: Clock> {
    launcher: JobLauncher<S, C>,
    artifacts: ArtifactService<C>,
    /// Required on completion callbacks when set
    callback_secret: Option<Arc<str>>,
}

impl<S, C: Clock> AppState<S, C> {
    pub fn new(
        launcher: JobLauncher<S, C>,
        artifacts: ArtifactService<C>,
        callback_secret: Option<String>,
    ) -> Self {
        Self { launcher, artifacts, callback_secret: callback_secret.map(Arc::from) }
    }

    pub fn launcher(&self) -> &JobLauncher<S, C> {
        &self.launcher
    }

    pub fn artifacts(&self) -> &ArtifactService<C> {
        &self.artifacts
    }
}

/// Build the HTTP router.
pub fn router<S, C>(state: AppState<S, C>) -> Router
where
    S: JobSubmitter,
    C: Clock + 'static,
{
    Router::new()
        .route("/health", get(health::health))
        .route("/api/jobs", post(jobs::create_job::<S, C>))
        .route("/api/collectArtifacts", post(artifacts::collect_artifacts::<S, C>))
        .route(
            "/api/artifacts",
            get(artifacts::list_artifacts::<S, C>).delete(artifacts::clear_artifacts::<S, C>),
        )
        .route("/api/artifacts/{job_name}", get(artifacts::get_artifact::<S, C>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod test_fixtures;
