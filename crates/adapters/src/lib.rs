// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Adapters for external I/O: the batch-execution substrate

pub mod job;

pub use job::{
    build_job, container_command, CallbackTarget, Credentials, JobParams, JobSubmitter,
    KubeJobSubmitter, SecretKeyRef, SubmitError,
};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use job::FakeSubmitter;
