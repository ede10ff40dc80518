// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job Launcher: turns a job request into a submitted workload.
//!
//! Construction errors (validation, unsupported phase) fail before anything
//! reaches the substrate. Once submitted, the launcher has no further
//! visibility into the job; its outcome arrives later, if at all, through the
//! completion callback.

use std::sync::Arc;

use k8s_openapi::api::batch::v1::Job;
use thiserror::Error;
use tracing::{debug, info, warn};
use x2a_adapters::{build_job, CallbackTarget, Credentials, JobParams, JobSubmitter, SubmitError};
use x2a_core::{Clock, JobName, JobRequest, RequestError};
use x2a_shell::{build_phase, wrap};

use crate::lifecycle::DeploymentProfile;

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error("job submission failed: {0}")]
    Submission(#[from] SubmitError),
}

/// Everything about a workload that does not come from the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSettings {
    pub namespace: String,
    pub image: String,
    pub profile: DeploymentProfile,
    pub callback: Option<CallbackTarget>,
    pub credentials: Credentials,
    pub config_secret: String,
    /// Insert a random suffix so same-millisecond duplicates get distinct names
    pub disambiguate_names: bool,
}

#[derive(Clone)]
pub struct JobLauncher<S, C> {
    settings: Arc<LaunchSettings>,
    submitter: S,
    clock: C,
}

impl<S: JobSubmitter, C: Clock> JobLauncher<S, C> {
    pub fn new(settings: LaunchSettings, submitter: S, clock: C) -> Self {
        Self { settings: Arc::new(settings), submitter, clock }
    }

    /// Validate `request` and build its Job without submitting it.
    pub fn prepare(&self, request: &JobRequest) -> Result<(JobName, Job), LaunchError> {
        let phase_request = request.validate()?;
        let phase = phase_request.phase();

        let epoch_ms = self.clock.epoch_ms();
        let job_name = if self.settings.disambiguate_names {
            JobName::generate_with_nonce(phase, &request.name, epoch_ms)
        } else {
            JobName::generate(phase, &request.name, epoch_ms)
        };

        let inner = build_phase(&phase_request);
        debug!(%job_name, command = %inner, "built job command");
        let command = match self.settings.profile {
            DeploymentProfile::Callback => wrap(&inner).argv(),
            DeploymentProfile::Minimal => inner.argv(),
        };

        let job = build_job(&JobParams {
            job_name: job_name.clone(),
            phase,
            namespace: self.settings.namespace.clone(),
            image: self.settings.image.clone(),
            command,
            module_name: phase_request.module_name().map(str::to_string),
            callback: self.settings.callback.clone(),
            credentials: self.settings.credentials.clone(),
            config_secret: self.settings.config_secret.clone(),
        });
        Ok((job_name, job))
    }

    /// Build and submit a workload for `request`, returning its identity.
    ///
    /// A rejection by the substrate is returned as-is; nothing is retried.
    pub async fn create_job(&self, request: &JobRequest) -> Result<JobName, LaunchError> {
        let (job_name, job) = self.prepare(request)?;

        match self.submitter.submit(&job).await {
            Ok(_) => {
                info!(
                    %job_name,
                    phase = job_name.phase().map(|p| p.as_str()).unwrap_or_default(),
                    namespace = %self.settings.namespace,
                    profile = %self.settings.profile,
                    "job submitted"
                );
                Ok(job_name)
            }
            Err(e) => {
                if e.is_conflict() {
                    warn!(%job_name, "job name already taken; resubmit to get a new timestamp");
                }
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
#[path = "launcher_tests.rs"]
mod tests;
