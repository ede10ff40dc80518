// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job identities.
//!
//! A job name has the shape `x2a-{phase}-{slug}-{base36 epoch ms}` and never
//! exceeds 63 characters, the ceiling the batch substrate places on resource
//! names. Only the human slug is shortened to make room; the prefix, phase and
//! timestamp always survive intact.
//!
//! Generation is deterministic: the same phase, name and timestamp always
//! yield the same identity, so two creations of the same name and phase within
//! one millisecond collide. The substrate rejects the second submission as a
//! duplicate. Callers that need to avoid that can opt into a random nonce with
//! [`JobName::generate_with_nonce`].

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::phase::MigrationPhase;

/// Hard ceiling on resource names imposed by the substrate.
pub const MAX_JOB_NAME_LEN: usize = 63;

/// Leading segment shared by every job this system creates.
pub const JOB_NAME_PREFIX: &str = "x2a";

/// Slug used when the human label has no usable characters.
const EMPTY_SLUG: &str = "job";

const NONCE_ALPHABET: [char; 36] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i',
    'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];

/// Length of the optional random disambiguator.
pub const NONCE_LEN: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobNameError {
    #[error("job name is empty")]
    Empty,

    #[error("job name exceeds {MAX_JOB_NAME_LEN} characters: {0}")]
    TooLong(String),

    #[error("job name contains characters outside [a-z0-9-]: {0}")]
    InvalidCharacters(String),

    #[error("job name must start with \"{JOB_NAME_PREFIX}-\" and a phase: {0}")]
    UnknownShape(String),
}

/// Identity of a submitted job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobName(String);

impl JobName {
    /// Derive the identity for a job created at `epoch_ms`.
    pub fn generate(phase: MigrationPhase, name: &str, epoch_ms: u64) -> Self {
        Self::compose(phase, name, None, epoch_ms)
    }

    /// Like [`JobName::generate`], with a random nonce ahead of the timestamp.
    pub fn generate_with_nonce(phase: MigrationPhase, name: &str, epoch_ms: u64) -> Self {
        Self::compose(phase, name, Some(&random_nonce()), epoch_ms)
    }

    fn compose(phase: MigrationPhase, name: &str, nonce: Option<&str>, epoch_ms: u64) -> Self {
        let head = format!("{}-{}-", JOB_NAME_PREFIX, phase);
        let tail = match nonce {
            Some(nonce) => format!("-{}-{}", nonce, to_base36(epoch_ms)),
            None => format!("-{}", to_base36(epoch_ms)),
        };
        let budget = MAX_JOB_NAME_LEN.saturating_sub(head.len() + tail.len());
        let mut slug = sanitize(name, budget);
        if slug.is_empty() {
            slug = EMPTY_SLUG.to_string();
        }
        Self(format!("{}{}{}", head, slug, tail))
    }

    /// Validate an identity received from outside (e.g. a completion report).
    pub fn parse(s: &str) -> Result<Self, JobNameError> {
        if s.is_empty() {
            return Err(JobNameError::Empty);
        }
        if s.len() > MAX_JOB_NAME_LEN {
            return Err(JobNameError::TooLong(s.to_string()));
        }
        if !s.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-') {
            return Err(JobNameError::InvalidCharacters(s.to_string()));
        }
        let mut segments = s.split('-');
        let prefix_ok = segments.next() == Some(JOB_NAME_PREFIX);
        let phase_ok = segments.next().is_some_and(|p| p.parse::<MigrationPhase>().is_ok());
        // prefix, phase, at least one slug segment, timestamp
        let rest_ok = segments.filter(|seg| !seg.is_empty()).count() >= 2;
        if !(prefix_ok && phase_ok && rest_ok) || s.ends_with('-') {
            return Err(JobNameError::UnknownShape(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }

    /// Phase encoded in the identity's second segment.
    pub fn phase(&self) -> Option<MigrationPhase> {
        self.0.split('-').nth(1).and_then(|p| p.parse().ok())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for JobName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<JobName> for String {
    fn from(name: JobName) -> Self {
        name.0
    }
}

impl PartialEq<str> for JobName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for JobName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Reduce a human label to a resource-name-safe slug of at most `max_len` chars.
///
/// Lowercases, replaces runs of anything outside `[a-z0-9]` with one hyphen,
/// then truncates at a hyphen boundary where possible. Never starts or ends
/// with a hyphen.
pub fn sanitize(input: &str, max_len: usize) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut last_was_hyphen = true;
    for ch in input.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch);
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    if slug.len() > max_len {
        match slug[..max_len].rfind('-') {
            // Keep at least half the budget rather than cutting to a tiny word
            Some(pos) if pos * 2 >= max_len => slug.truncate(pos),
            _ => slug.truncate(max_len),
        }
    }

    slug.trim_end_matches('-').to_string()
}

/// Lowercase base-36 rendering of `n`.
pub fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(NONCE_ALPHABET[(n % 36) as usize]);
        n /= 36;
    }
    digits.iter().rev().collect()
}

fn random_nonce() -> String {
    nanoid::nanoid!(NONCE_LEN, &NONCE_ALPHABET)
}

#[cfg(test)]
#[path = "job_name_tests.rs"]
mod tests;
