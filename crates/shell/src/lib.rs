// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! x2a-shell: job command construction and the completion callback wrapper

pub mod builder;
pub mod command;
pub mod wrapper;

pub use builder::{build, build_phase};
pub use command::{quote, CommandLine};
pub use wrapper::{wrap, wrapper_script};
