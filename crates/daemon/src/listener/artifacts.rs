// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Completion callbacks and the artifact read/debug surface.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use x2a_adapters::JobSubmitter;
use x2a_core::{Clock, CompletionReport, LedgerEntry, CALLBACK_SECRET_HEADER};

use super::{ApiError, AppState};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectResponse {
    pub status: String,
    pub job_name: String,
}

/// `POST /api/collectArtifacts`
pub(super) async fn collect_artifacts<S, C>(
    State(state): State<AppState<S, C>>,
    headers: HeaderMap,
    payload: Result<Json<CompletionReport>, JsonRejection>,
) -> Result<Json<CollectResponse>, ApiError>
where
    S: JobSubmitter,
    C: Clock + 'static,
{
    authorize(state.callback_secret.as_deref(), &headers)?;
    let Json(report) = payload?;

    let entry = state.artifacts.collect(report).await?;
    Ok(Json(CollectResponse { status: "ok".to_string(), job_name: entry.report.job_name }))
}

/// `GET /api/artifacts`
pub(super) async fn list_artifacts<S, C>(
    State(state): State<AppState<S, C>>,
) -> Result<Json<Vec<LedgerEntry>>, ApiError>
where
    S: JobSubmitter,
    C: Clock + 'static,
{
    Ok(Json(state.artifacts.all().await?))
}

/// `GET /api/artifacts/{jobName}`
pub(super) async fn get_artifact<S, C>(
    State(state): State<AppState<S, C>>,
    Path(job_name): Path<String>,
) -> Result<Json<LedgerEntry>, ApiError>
where
    S: JobSubmitter,
    C: Clock + 'static,
{
    match state.artifacts.find(job_name.clone()).await? {
        Some(entry) => Ok(Json(entry)),
        None => Err(ApiError::NotFound(job_name)),
    }
}

/// `DELETE /api/artifacts`
pub(super) async fn clear_artifacts<S, C>(
    State(state): State<AppState<S, C>>,
) -> Result<StatusCode, ApiError>
where
    S: JobSubmitter,
    C: Clock + 'static,
{
    state.artifacts.clear().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Check the callback secret header when a secret is configured.
fn authorize(expected: Option<&str>, headers: &HeaderMap) -> Result<(), ApiError> {
    let Some(expected) = expected else {
        return Ok(());
    };
    let provided = headers.get(CALLBACK_SECRET_HEADER).map(|v| v.as_bytes()).unwrap_or_default();
    if bool::from(provided.ct_eq(expected.as_bytes())) {
        Ok(())
    } else {
        Err(ApiError::Unauthorized)
    }
}

#[cfg(test)]
#[path = "artifacts_tests.rs"]
mod tests;
