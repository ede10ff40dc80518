// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! x2a daemon library
//!
//! Launches migration phases as Kubernetes Jobs and collects the completion
//! reports those Jobs send back.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod artifacts;
pub mod env;
pub mod launcher;
pub mod lifecycle;
pub mod listener;

pub use artifacts::{ArtifactError, ArtifactService};
pub use launcher::{JobLauncher, LaunchError, LaunchSettings};
pub use lifecycle::{app_state, startup, Config, DeploymentProfile, LifecycleError};
pub use listener::{router, ApiError, AppState};
