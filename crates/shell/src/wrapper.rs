// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Callback wrapper: reports a command's completion to the callback endpoint.
//!
//! The wrapper is a fixed POSIX `sh` script. The inner command is handed to it
//! as positional parameters and run as `"$@"`, so user-controlled values are
//! never part of the script text. After the inner command exits the script:
//!
//! ```text
//! 1. captures the exit code
//! 2. maps it to status = success | failure
//! 3. builds {jobName, phase, status, timestamp} from $JOB_NAME, $MIGRATION_PHASE
//!    and a UTC timestamp taken at that moment
//! 4. POSTs it to $CALLBACK_URL (if set), with $CALLBACK_SECRET as a header
//!    (if set), bounded by a 10s timeout; any delivery failure, including an
//!    HTTP error status from the endpoint, is logged and otherwise ignored
//! 5. exits with the inner command's exit code
//! ```

use std::sync::LazyLock;

use x2a_core::callback::env;
use x2a_core::{CALLBACK_SECRET_HEADER, CALLBACK_TIMEOUT};

use crate::command::CommandLine;

/// Shell used to run the wrapper script.
pub const WRAPPER_SHELL: &str = "/bin/sh";

/// `$0` for the wrapper script; shows up in the shell's own error messages.
pub const WRAPPER_ARG0: &str = "x2a-job";

/// Prefix on every line the wrapper itself prints.
pub const LOG_PREFIX: &str = "x2a-callback:";

const SCRIPT_TEMPLATE: &str = r#""$@"
exit_code=$?
if [ "$exit_code" -eq 0 ]; then
  status=success
else
  status=failure
fi
timestamp=$(date -u +%Y-%m-%dT%H:%M:%SZ)
payload=$(printf '{"jobName":"%s","phase":"%s","status":"%s","timestamp":"%s"}' "${@JOB_NAME@:-}" "${@MIGRATION_PHASE@:-}" "$status" "$timestamp")
echo "@LOG_PREFIX@ $payload"
if [ -n "${@CALLBACK_URL@:-}" ]; then
  if [ -n "${@CALLBACK_SECRET@:-}" ]; then
    curl -sS --fail -X POST --max-time @TIMEOUT@ -H 'Content-Type: application/json' -H "@HEADER@: ${@CALLBACK_SECRET@}" --data "$payload" "${@CALLBACK_URL@}" >/dev/null \
      || echo "@LOG_PREFIX@ delivery failed" >&2
  else
    curl -sS --fail -X POST --max-time @TIMEOUT@ -H 'Content-Type: application/json' --data "$payload" "${@CALLBACK_URL@}" >/dev/null \
      || echo "@LOG_PREFIX@ delivery failed" >&2
  fi
else
  echo "@LOG_PREFIX@ @CALLBACK_URL@ not set, skipping delivery" >&2
fi
exit "$exit_code"
"#;

static WRAPPER_SCRIPT: LazyLock<String> = LazyLock::new(|| {
    SCRIPT_TEMPLATE
        .replace("@JOB_NAME@", env::JOB_NAME)
        .replace("@MIGRATION_PHASE@", env::MIGRATION_PHASE)
        .replace("@CALLBACK_URL@", env::CALLBACK_URL)
        .replace("@CALLBACK_SECRET@", env::CALLBACK_SECRET)
        .replace("@HEADER@", CALLBACK_SECRET_HEADER)
        .replace("@TIMEOUT@", &CALLBACK_TIMEOUT.as_secs().to_string())
        .replace("@LOG_PREFIX@", LOG_PREFIX)
});

/// The wrapper script text.
pub fn wrapper_script() -> &'static str {
    &WRAPPER_SCRIPT
}

/// Wrap `inner` so its completion is reported through the callback.
///
/// The result runs `/bin/sh -c <script> x2a-job <inner argv...>`. Its exit
/// code always equals the inner command's exit code.
pub fn wrap(inner: &CommandLine) -> CommandLine {
    CommandLine::new(WRAPPER_SHELL, ["-c", wrapper_script(), WRAPPER_ARG0]).args(inner.argv())
}

#[cfg(all(test, unix))]
#[path = "wrapper_tests.rs"]
mod tests;
