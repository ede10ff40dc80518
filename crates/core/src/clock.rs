// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wall-clock time for job identities and ledger timestamps.
//!
//! Job names embed epoch milliseconds and ledger entries carry RFC 3339
//! timestamps; both come from the same [`Clock`], so a test can pin the two
//! together with a [`FakeClock`].

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::Mutex;

/// Source of the current UTC time.
pub trait Clock: Clone + Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;

    /// Milliseconds since the Unix epoch; zero for instants before it.
    fn epoch_ms(&self) -> u64 {
        u64::try_from(self.now_utc().timestamp_millis()).unwrap_or_default()
    }
}

#[derive(Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock, shared between clones.
#[derive(Clone)]
pub struct FakeClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

/// 2026-01-01T00:00:00Z
const FAKE_START_MS: i64 = 1_767_225_600_000;

impl FakeClock {
    pub fn new() -> Self {
        let start = DateTime::from_timestamp_millis(FAKE_START_MS).unwrap_or_default();
        Self { now: Arc::new(Mutex::new(start)) }
    }

    pub fn advance(&self, duration: Duration) {
        let delta = TimeDelta::from_std(duration).unwrap_or(TimeDelta::MAX);
        let mut now = self.now.lock();
        *now = now.checked_add_signed(delta).unwrap_or(DateTime::<Utc>::MAX_UTC);
    }

    pub fn set(&self, at: DateTime<Utc>) {
        *self.now.lock() = at;
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now_utc(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
