// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Batch-execution substrate: submitting migration workloads.
//!
//! A workload is a Kubernetes `batch/v1` Job. Once submitted it runs to
//! completion on its own; the only thing that comes back is its completion
//! callback, which the daemon receives separately.

mod k8s;
mod spec;

pub use k8s::KubeJobSubmitter;
pub use spec::{
    build_job, container_command, CallbackTarget, Credentials, JobParams, SecretEnv, SecretKeyRef,
    CALLBACK_SECRET_KEY, CONFIG_MOUNT_PATH, CONTAINER_NAME, JOB_NAME_LABEL, PHASE_LABEL,
    SECRET_ENV,
};

use async_trait::async_trait;
use k8s_openapi::api::batch::v1::Job;
use thiserror::Error;

/// Errors from workload submission
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// The substrate refused the workload (permission denied, duplicate name, quota)
    #[error("workload rejected ({code} {reason}): {message}")]
    Rejected { code: u16, reason: String, message: String },

    /// The substrate could not be reached
    #[error("substrate unavailable: {0}")]
    Transport(String),
}

impl SubmitError {
    /// A workload with the same name already exists.
    pub fn is_conflict(&self) -> bool {
        matches!(self, SubmitError::Rejected { code: 409, .. })
    }
}

/// Submits workloads to the batch-execution substrate.
#[async_trait]
pub trait JobSubmitter: Clone + Send + Sync + 'static {
    /// Create the Job, returning the name the substrate accepted.
    async fn submit(&self, job: &Job) -> Result<String, SubmitError>;
}

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeSubmitter;
