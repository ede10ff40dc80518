// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Completion reports and ledger entries.
//!
//! A [`CompletionReport`] is what a finished job sends back through its
//! callback. The server enriches it into a [`LedgerEntry`] by stamping
//! `collectedAt` and filling `timestamp` when the job left it out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::job_name::{JobName, JobNameError};
use crate::phase::MigrationPhase;

/// Terminal outcome reported by a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Success,
    Failure,
}

/// Finer-grained detail for a status, e.g. which step failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Substatus {
    pub key: String,
    pub message: String,
}

/// Pointer to an artifact produced by a phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRef {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ArtifactRef {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into(), description: None }
    }
}

/// Artifact references, one slot per phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactReferences {
    /// Produced by `init`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub migration_plan: Option<ArtifactRef>,
    /// Produced by `analyze`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_migration_plan: Option<ArtifactRef>,
    /// Produced by `migrate`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ansible_sources: Option<ArtifactRef>,
    /// Produced by `publish`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gitops_repo: Option<ArtifactRef>,
}

impl ArtifactReferences {
    /// Wire key of the slot a phase fills.
    pub fn key_for(phase: MigrationPhase) -> &'static str {
        match phase {
            MigrationPhase::Init => "migrationPlan",
            MigrationPhase::Analyze => "moduleMigrationPlan",
            MigrationPhase::Migrate => "ansibleSources",
            MigrationPhase::Publish => "gitopsRepo",
        }
    }

    /// Keys of populated slots that belong to a different phase.
    pub fn foreign_keys(&self, phase: MigrationPhase) -> Vec<&'static str> {
        let own = Self::key_for(phase);
        [
            ("migrationPlan", self.migration_plan.is_some()),
            ("moduleMigrationPlan", self.module_migration_plan.is_some()),
            ("ansibleSources", self.ansible_sources.is_some()),
            ("gitopsRepo", self.gitops_repo.is_some()),
        ]
        .into_iter()
        .filter(|(key, present)| *present && *key != own)
        .map(|(key, _)| key)
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    #[error("malformed jobName: {0}")]
    JobName(#[from] JobNameError),

    #[error("jobName {job_name} belongs to phase {expected}, report says {reported}")]
    PhaseMismatch { job_name: String, expected: MigrationPhase, reported: MigrationPhase },
}

/// Payload delivered by a job's completion callback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionReport {
    pub job_name: String,
    pub phase: MigrationPhase,
    pub status: ReportStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub substatus: Option<Substatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub migration_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "artifacts")]
    pub artifact_references: Option<ArtifactReferences>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

impl CompletionReport {
    pub fn new(job_name: impl Into<String>, phase: MigrationPhase, status: ReportStatus) -> Self {
        Self {
            job_name: job_name.into(),
            phase,
            status,
            substatus: None,
            migration_id: None,
            module_id: None,
            artifact_references: None,
            timestamp: None,
            metadata: None,
        }
    }

    /// Check that the report names a well-formed job of its own phase.
    pub fn validate(&self) -> Result<JobName, ReportError> {
        let name = JobName::parse(&self.job_name)?;
        match name.phase() {
            Some(expected) if expected != self.phase => Err(ReportError::PhaseMismatch {
                job_name: self.job_name.clone(),
                expected,
                reported: self.phase,
            }),
            _ => Ok(name),
        }
    }
}

/// A completion report after server-side enrichment. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    #[serde(flatten)]
    pub report: CompletionReport,
    pub collected_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Enrich a report collected at `now`.
    ///
    /// `collectedAt` is always `now`; `timestamp` is only filled when absent.
    pub fn collect(mut report: CompletionReport, now: DateTime<Utc>) -> Self {
        report.timestamp.get_or_insert(now);
        Self { report, collected_at: now }
    }

    pub fn job_name(&self) -> &str {
        &self.report.job_name
    }
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
