// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use async_trait::async_trait;
use k8s_openapi::api::batch::v1::Job;
use kube::api::{Api, PostParams};
use kube::Client;

use super::{JobSubmitter, SubmitError};

/// Submits Jobs through the Kubernetes API.
#[derive(Clone)]
pub struct KubeJobSubmitter {
    client: Client,
    namespace: String,
}

impl KubeJobSubmitter {
    pub fn new(client: Client, namespace: impl Into<String>) -> Self {
        Self { client, namespace: namespace.into() }
    }

    /// Connect using the ambient kubeconfig or in-cluster service account.
    pub async fn connect(namespace: impl Into<String>) -> Result<Self, SubmitError> {
        let client = Client::try_default()
            .await
            .map_err(|e| SubmitError::Transport(format!("failed to create kube client: {}", e)))?;
        Ok(Self::new(client, namespace))
    }
}

#[async_trait]
impl JobSubmitter for KubeJobSubmitter {
    async fn submit(&self, job: &Job) -> Result<String, SubmitError> {
        let namespace = job.metadata.namespace.as_deref().unwrap_or(&self.namespace);
        let jobs: Api<Job> = Api::namespaced(self.client.clone(), namespace);

        let created = jobs.create(&PostParams::default(), job).await.map_err(|e| {
            tracing::warn!(
                job_name = job.metadata.name.as_deref().unwrap_or_default(),
                %namespace,
                error = %e,
                "job submission failed"
            );
            submit_error(e)
        })?;

        let name = created.metadata.name.or_else(|| job.metadata.name.clone()).unwrap_or_default();
        tracing::info!(job_name = %name, %namespace, "job created");
        Ok(name)
    }
}

/// Keep the API server's status detail for rejections.
pub(super) fn submit_error(err: kube::Error) -> SubmitError {
    match err {
        kube::Error::Api(resp) => {
            SubmitError::Rejected { code: resp.code, reason: resp.reason, message: resp.message }
        }
        other => SubmitError::Transport(other.to_string()),
    }
}

#[cfg(test)]
#[path = "k8s_tests.rs"]
mod tests;
