// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job creation requests and their structural validation.
//!
//! A [`JobRequest`] is the loose wire shape: every field is optional so that
//! missing values surface as [`RequestError::Validation`] instead of a
//! deserialization failure. [`JobRequest::validate`] turns it into a
//! [`PhaseRequest`], which only carries the fields its phase uses.
//! Nothing here is checked against cluster state.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::phase::MigrationPhase;

/// Errors raised while validating a job request, before anything is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("invalid job request: {0}")]
    Validation(String),

    #[error("unsupported migration phase: {0:?}")]
    UnsupportedPhase(String),
}

/// Input to job creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRequest {
    #[serde(default)]
    pub phase: String,
    /// Human label, folded into the job identity.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_technology: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_branch: Option<String>,
    #[serde(default)]
    pub skip_git: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collections_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory_file: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_paths: Vec<String>,
}

/// A validated request, shaped by its phase.
///
/// Optional values are normalized (blank strings become `None`) but defaults
/// are not applied here; the command builder owns those.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhaseRequest {
    Init { description: String },
    Analyze { description: String, module_name: String },
    Migrate { module_name: String, source_technology: Option<String> },
    Publish(PublishRequest),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishRequest {
    pub module_name: String,
    pub source_paths: Vec<String>,
    pub github_owner: String,
    pub github_branch: Option<String>,
    pub skip_git: bool,
    pub base_path: Option<String>,
    pub collections_file: Option<String>,
    pub inventory_file: Option<String>,
}

impl PhaseRequest {
    pub fn phase(&self) -> MigrationPhase {
        match self {
            PhaseRequest::Init { .. } => MigrationPhase::Init,
            PhaseRequest::Analyze { .. } => MigrationPhase::Analyze,
            PhaseRequest::Migrate { .. } => MigrationPhase::Migrate,
            PhaseRequest::Publish(_) => MigrationPhase::Publish,
        }
    }

    pub fn module_name(&self) -> Option<&str> {
        match self {
            PhaseRequest::Init { .. } => None,
            PhaseRequest::Analyze { module_name, .. } | PhaseRequest::Migrate { module_name, .. } => {
                Some(module_name)
            }
            PhaseRequest::Publish(p) => Some(&p.module_name),
        }
    }
}

impl JobRequest {
    pub fn new(
        phase: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            phase: phase.into(),
            name: name.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn with_module(mut self, module_name: impl Into<String>) -> Self {
        self.module_name = Some(module_name.into());
        self
    }

    /// Check presence of the fields the phase needs.
    ///
    /// `phase`, `name` and `description` are required for every phase and are
    /// checked before the phase value itself, so an empty phase is a
    /// validation error while an unknown one is [`RequestError::UnsupportedPhase`].
    pub fn validate(&self) -> Result<PhaseRequest, RequestError> {
        require("phase", &self.phase)?;
        require("name", &self.name)?;
        require("description", &self.description)?;

        let phase: MigrationPhase = self.phase.parse()?;
        let description = self.description.trim().to_string();

        let module_name = if phase.requires_module() {
            Some(required_opt("moduleName", &self.module_name, phase)?)
        } else {
            None
        };

        let request = match (phase, module_name) {
            (MigrationPhase::Init, _) => PhaseRequest::Init { description },
            (MigrationPhase::Analyze, Some(module_name)) => {
                PhaseRequest::Analyze { description, module_name }
            }
            (MigrationPhase::Migrate, Some(module_name)) => PhaseRequest::Migrate {
                module_name,
                source_technology: normalized(&self.source_technology),
            },
            (MigrationPhase::Publish, Some(module_name)) => {
                PhaseRequest::Publish(PublishRequest {
                    module_name,
                    source_paths: self
                        .source_paths
                        .iter()
                        .map(|p| p.trim())
                        .filter(|p| !p.is_empty())
                        .map(str::to_string)
                        .collect(),
                    github_owner: required_opt("githubOwner", &self.github_owner, phase)?,
                    github_branch: normalized(&self.github_branch),
                    skip_git: self.skip_git,
                    base_path: normalized(&self.base_path),
                    collections_file: normalized(&self.collections_file),
                    inventory_file: normalized(&self.inventory_file),
                })
            }
            (phase, None) => {
                return Err(RequestError::Validation(format!("moduleName is required for {phase}")))
            }
        };
        Ok(request)
    }
}

fn require(field: &str, value: &str) -> Result<(), RequestError> {
    if value.trim().is_empty() {
        return Err(RequestError::Validation(format!("{field} is required")));
    }
    Ok(())
}

fn required_opt(
    field: &str,
    value: &Option<String>,
    phase: MigrationPhase,
) -> Result<String, RequestError> {
    normalized(value)
        .ok_or_else(|| RequestError::Validation(format!("{field} is required for {phase}")))
}

fn normalized(value: &Option<String>) -> Option<String> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
