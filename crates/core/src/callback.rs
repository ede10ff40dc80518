// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Names shared between the workload and the callback endpoint.
//!
//! The launcher injects these variables into every workload and the wrapper
//! script reads them back, so both sides must agree on the spelling.

use std::time::Duration;

/// Header carrying the shared callback secret.
pub const CALLBACK_SECRET_HEADER: &str = "x-callback-secret";

/// Upper bound on the wrapper's outbound callback request.
pub const CALLBACK_TIMEOUT: Duration = Duration::from_secs(10);

/// Workload environment variable names.
pub mod env {
    pub const JOB_NAME: &str = "JOB_NAME";
    pub const MIGRATION_PHASE: &str = "MIGRATION_PHASE";
    pub const MODULE_NAME: &str = "MODULE_NAME";
    pub const CALLBACK_URL: &str = "CALLBACK_URL";
    pub const CALLBACK_SECRET: &str = "CALLBACK_SECRET";
}
