// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! x2a-core: domain types for migration job orchestration

pub mod callback;
pub mod clock;
pub mod job_name;
pub mod phase;
pub mod report;
pub mod request;

pub use callback::{CALLBACK_SECRET_HEADER, CALLBACK_TIMEOUT};
pub use clock::{Clock, FakeClock, SystemClock};
pub use job_name::{sanitize, to_base36, JobName, JobNameError, MAX_JOB_NAME_LEN};
pub use phase::MigrationPhase;
pub use report::{
    ArtifactRef, ArtifactReferences, CompletionReport, LedgerEntry, ReportError, ReportStatus,
    Substatus,
};
pub use request::{JobRequest, PhaseRequest, PublishRequest, RequestError};
