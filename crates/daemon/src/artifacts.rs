// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Artifact collection: the async face of the ledger.
//!
//! Ledger I/O is blocking and runs on tokio's blocking pool.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};
use x2a_core::{ArtifactReferences, Clock, CompletionReport, LedgerEntry, ReportError};
use x2a_storage::{Ledger, LedgerError};

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error(transparent)]
    Report(#[from] ReportError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("ledger task failed: {0}")]
    Task(String),
}

#[derive(Clone)]
pub struct ArtifactService<C: Clock> {
    ledger: Arc<Ledger<C>>,
}

impl<C: Clock + 'static> ArtifactService<C> {
    pub fn new(ledger: Ledger<C>) -> Self {
        Self { ledger: Arc::new(ledger) }
    }

    /// Validate and durably record a completion report.
    pub async fn collect(&self, report: CompletionReport) -> Result<LedgerEntry, ArtifactError> {
        let job_name = report.validate()?;
        if let Some(ref artifacts) = report.artifact_references {
            let foreign = artifacts.foreign_keys(report.phase);
            if !foreign.is_empty() {
                warn!(
                    %job_name,
                    phase = %report.phase,
                    expected = ArtifactReferences::key_for(report.phase),
                    ?foreign,
                    "report carries artifacts of another phase"
                );
            }
        }

        let entry = self.blocking(move |ledger| ledger.append(report)).await?;
        info!(%job_name, status = ?entry.report.status, "artifacts collected");
        Ok(entry)
    }

    pub async fn all(&self) -> Result<Vec<LedgerEntry>, ArtifactError> {
        self.blocking(|ledger| ledger.read_all()).await
    }

    pub async fn find(&self, job_name: String) -> Result<Option<LedgerEntry>, ArtifactError> {
        self.blocking(move |ledger| ledger.find_by_job_name(&job_name)).await
    }

    pub async fn count(&self) -> Result<usize, ArtifactError> {
        Ok(self.all().await?.len())
    }

    pub async fn clear(&self) -> Result<(), ArtifactError> {
        self.blocking(|ledger| ledger.clear()).await?;
        info!("artifact ledger cleared");
        Ok(())
    }

    async fn blocking<T, F>(&self, f: F) -> Result<T, ArtifactError>
    where
        T: Send + 'static,
        F: FnOnce(&Ledger<C>) -> Result<T, LedgerError> + Send + 'static,
    {
        let ledger = Arc::clone(&self.ledger);
        tokio::task::spawn_blocking(move || f(&ledger))
            .await
            .map_err(|e| ArtifactError::Task(e.to_string()))?
            .map_err(ArtifactError::from)
    }
}

#[cfg(test)]
#[path = "artifacts_tests.rs"]
mod tests;
