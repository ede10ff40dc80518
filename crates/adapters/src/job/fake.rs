// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use k8s_openapi::api::batch::v1::Job;
use parking_lot::Mutex;

use super::{JobSubmitter, SubmitError};

#[derive(Default)]
struct FakeSubmitterState {
    jobs: Vec<Job>,
    failures: VecDeque<SubmitError>,
}

/// In-memory substrate for tests.
///
/// Records every accepted Job and, like the API server, rejects a second Job
/// with a name it has already accepted.
#[derive(Clone, Default)]
pub struct FakeSubmitter {
    inner: Arc<Mutex<FakeSubmitterState>>,
}

impl FakeSubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next submission with `err`. Queued failures apply in order.
    pub fn fail_next(&self, err: SubmitError) {
        self.inner.lock().failures.push_back(err);
    }

    /// All accepted Jobs, in submission order
    pub fn jobs(&self) -> Vec<Job> {
        self.inner.lock().jobs.clone()
    }

    pub fn last_job(&self) -> Option<Job> {
        self.inner.lock().jobs.last().cloned()
    }
}

#[async_trait]
impl JobSubmitter for FakeSubmitter {
    async fn submit(&self, job: &Job) -> Result<String, SubmitError> {
        let mut state = self.inner.lock();
        if let Some(err) = state.failures.pop_front() {
            return Err(err);
        }

        let name = job.metadata.name.clone().unwrap_or_default();
        if state.jobs.iter().any(|j| j.metadata.name.as_deref() == Some(name.as_str())) {
            return Err(SubmitError::Rejected {
                code: 409,
                reason: "AlreadyExists".to_string(),
                message: format!("jobs.batch \"{}\" already exists", name),
            });
        }
        state.jobs.push(job.clone());
        Ok(name)
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
