// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Migration phases.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::request::RequestError;

/// One of the four fixed stages of a migration workflow.
///
/// The phase decides which request fields are meaningful, which command
/// shape the job runs, and which artifact reference the completion report
/// is expected to carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MigrationPhase {
    Init,
    Analyze,
    Migrate,
    Publish,
}

impl MigrationPhase {
    pub const ALL: [MigrationPhase; 4] = [
        MigrationPhase::Init,
        MigrationPhase::Analyze,
        MigrationPhase::Migrate,
        MigrationPhase::Publish,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MigrationPhase::Init => "init",
            MigrationPhase::Analyze => "analyze",
            MigrationPhase::Migrate => "migrate",
            MigrationPhase::Publish => "publish",
        }
    }

    /// Every phase after `init` operates on a single module.
    pub fn requires_module(&self) -> bool {
        !matches!(self, MigrationPhase::Init)
    }
}

impl fmt::Display for MigrationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MigrationPhase {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MigrationPhase::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| RequestError::UnsupportedPhase(s.to_string()))
    }
}

#[cfg(test)]
#[path = "phase_tests.rs"]
mod tests;
