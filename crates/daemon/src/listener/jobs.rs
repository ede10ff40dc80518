// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use x2a_adapters::JobSubmitter;
use x2a_core::{Clock, JobName, JobRequest};

use super::{ApiError, AppState};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobResponse {
    pub job_name: JobName,
}

/// `POST /api/jobs`
pub(super) async fn create_job<S, C>(
    State(state): State<AppState<S, C>>,
    payload: Result<Json<JobRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateJobResponse>), ApiError>
where
    S: JobSubmitter,
    C: Clock + 'static,
{
    let Json(request) = payload?;
    let job_name = state.launcher.create_job(&request).await?;
    Ok((StatusCode::CREATED, Json(CreateJobResponse { job_name })))
}

#[cfg(test)]
#[path = "jobs_tests.rs"]
mod tests;
