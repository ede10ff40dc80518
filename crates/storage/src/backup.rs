// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Archived ledgers.
//!
//! Clearing a ledger moves it to `<name>.bak`. Earlier archives shift to
//! `.bak.2` and `.bak.3`; the one past that is deleted.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;

pub(crate) const MAX_ARCHIVES: u32 = 3;

/// Path of the `generation`-th newest archive of `ledger` (1 is newest).
pub(crate) fn archive_path(ledger: &Path, generation: u32) -> PathBuf {
    match generation {
        1 => ledger.with_extension("bak"),
        n => ledger.with_extension(format!("bak.{n}")),
    }
}

/// Move `ledger` to its newest archive slot, returning the archive path.
///
/// Failing to shift an older archive only costs that archive and is logged;
/// failing to move the ledger itself is an error.
pub(crate) fn archive(ledger: &Path) -> io::Result<PathBuf> {
    let oldest = archive_path(ledger, MAX_ARCHIVES);
    discard(&oldest);

    for generation in (1..MAX_ARCHIVES).rev() {
        let from = archive_path(ledger, generation);
        let to = archive_path(ledger, generation + 1);
        match fs::rename(&from, &to) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!(
                    from = %from.display(),
                    to = %to.display(),
                    error = %e,
                    "failed to shift ledger archive"
                );
                discard(&from);
            }
        }
    }

    let newest = archive_path(ledger, 1);
    fs::rename(ledger, &newest)?;
    Ok(newest)
}

fn discard(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "failed to remove ledger archive"),
    }
}

#[cfg(test)]
#[path = "backup_tests.rs"]
mod tests;
