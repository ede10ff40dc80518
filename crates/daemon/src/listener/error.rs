// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mapping of daemon errors onto HTTP responses.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use x2a_adapters::SubmitError;
use x2a_core::{ReportError, RequestError};

use crate::artifacts::ArtifactError;
use crate::launcher::LaunchError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("malformed request body: {0}")]
    Body(String),

    #[error("missing or invalid callback secret")]
    Unauthorized,

    #[error("no artifacts recorded for {0}")]
    NotFound(String),

    #[error("job submission failed: {0}")]
    Submission(#[from] SubmitError),

    #[error("storage failure: {0}")]
    Storage(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Request(_) | ApiError::Report(_) | ApiError::Body(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Submission(_) => StatusCode::BAD_GATEWAY,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<LaunchError> for ApiError {
    fn from(e: LaunchError) -> Self {
        match e {
            LaunchError::Request(e) => ApiError::Request(e),
            LaunchError::Submission(e) => ApiError::Submission(e),
        }
    }
}

impl From<ArtifactError> for ApiError {
    fn from(e: ArtifactError) -> Self {
        match e {
            ArtifactError::Report(e) => ApiError::Report(e),
            other => ApiError::Storage(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        ApiError::Body(e.body_text())
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    code: u16,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = self.to_string();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), %error, "request failed");
        } else {
            tracing::warn!(status = status.as_u16(), %error, "request rejected");
        }
        (status, Json(ErrorBody { error, code: status.as_u16() })).into_response()
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
