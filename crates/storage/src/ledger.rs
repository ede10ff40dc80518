// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only artifact ledger.
//!
//! One JSON object per line, each an enriched completion report. Records are
//! never rewritten; the only destructive operation is [`Ledger::clear`], which
//! moves the whole file aside.
//!
//! Appends are serialized twice: an in-process mutex orders writers sharing a
//! `Ledger`, and an advisory exclusive file lock orders writers in other
//! processes sharing the same file. Each record goes out in a single
//! `write_all` followed by `sync_data`. A writer that was waiting on the lock
//! while another process cleared the ledger reopens the path after locking,
//! so it never appends to an archived file.
//!
//! Readers take no lock. A trailing line without its newline is either an
//! append still in flight or a torn write from a crash, and is skipped either
//! way. Any other line that fails to parse is skipped and reported on its own
//! without affecting the rest of the read.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, info, warn};
use x2a_core::{Clock, CompletionReport, LedgerEntry, SystemClock};

use crate::backup;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("ledger IO error: {0}")]
    Io(#[from] io::Error),

    #[error("ledger serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A stored line that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorruptRecord {
    /// 1-based line number in the ledger file
    pub line: usize,
    pub error: String,
}

/// Result of a full read: every valid entry plus the lines that were skipped.
#[derive(Debug, Default)]
pub struct LedgerScan {
    pub entries: Vec<LedgerEntry>,
    pub corrupt: Vec<CorruptRecord>,
    /// The file ended in a partial record (in-flight append or torn write).
    pub incomplete_tail: bool,
}

enum Record {
    Entry(LedgerEntry),
    Corrupt(CorruptRecord),
}

/// Durable, line-oriented log of completion reports.
pub struct Ledger<C: Clock = SystemClock> {
    path: PathBuf,
    clock: C,
    write_lock: Mutex<()>,
}

impl Ledger<SystemClock> {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LedgerError> {
        Self::with_clock(path, SystemClock)
    }
}

impl<C: Clock> Ledger<C> {
    /// Prepare a ledger at `path`. The file itself is created on first append.
    pub fn with_clock(path: impl Into<PathBuf>, clock: C) -> Result<Self, LedgerError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Ok(Self { path, clock, write_lock: Mutex::new(()) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Enrich `report` and append it as one record.
    ///
    /// Sets `collectedAt` to now, and `timestamp` to now when the report has
    /// none. Returns the entry exactly as stored.
    pub fn append(&self, report: CompletionReport) -> Result<LedgerEntry, LedgerError> {
        let entry = LedgerEntry::collect(report, self.clock.now_utc());
        let mut line = serde_json::to_vec(&entry)?;
        line.push(b'\n');

        let _guard = self.write_lock.lock();
        let mut file = self.open_locked()?;

        if ends_mid_record(&mut file)? {
            warn!(path = %self.path.display(), "ledger ends in a partial record, starting a new line");
            line.insert(0, b'\n');
        }
        file.write_all(&line)?;
        file.sync_data()?;

        debug!(job_name = %entry.job_name(), status = ?entry.report.status, "ledger append");
        Ok(entry)
    }

    /// All valid entries in insertion order. A ledger that was never written
    /// reads as empty.
    pub fn read_all(&self) -> Result<Vec<LedgerEntry>, LedgerError> {
        Ok(self.scan()?.entries)
    }

    /// Like [`Ledger::read_all`], also returning the records that were skipped.
    pub fn scan(&self) -> Result<LedgerScan, LedgerError> {
        let mut entries = Vec::new();
        let mut corrupt = Vec::new();
        let incomplete_tail = self.visit(|record| {
            match record {
                Record::Entry(entry) => entries.push(entry),
                Record::Corrupt(record) => corrupt.push(record),
            }
            ControlFlow::Continue(())
        })?;
        Ok(LedgerScan { entries, corrupt, incomplete_tail })
    }

    /// First entry recorded for `job_name`, in insertion order.
    ///
    /// Duplicate deliveries of the same report leave later entries in the
    /// file; the earliest one wins.
    pub fn find_by_job_name(&self, job_name: &str) -> Result<Option<LedgerEntry>, LedgerError> {
        let mut found = None;
        self.visit(|record| match record {
            Record::Entry(entry) if entry.job_name() == job_name => {
                found = Some(entry);
                ControlFlow::Break(())
            }
            _ => ControlFlow::Continue(()),
        })?;
        Ok(found)
    }

    /// Empty the ledger.
    ///
    /// The current file is moved to a rotated `.bak` (at most three kept);
    /// clearing a ledger that does not exist is a no-op.
    pub fn clear(&self) -> Result<(), LedgerError> {
        let _guard = self.write_lock.lock();
        loop {
            let file = match File::open(&self.path) {
                Ok(file) => file,
                Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
                Err(e) => return Err(e.into()),
            };
            file.lock_exclusive()?;
            if !still_current(&file, &self.path)? {
                continue;
            }

            let archived = backup::archive(&self.path)?;
            info!(path = %self.path.display(), archived = %archived.display(), "ledger cleared");
            return Ok(());
        }
    }

    /// Open the ledger for appending and take its exclusive lock.
    ///
    /// The lock is released when the returned file is dropped.
    fn open_locked(&self) -> Result<File, LedgerError> {
        loop {
            let file = OpenOptions::new().create(true).read(true).append(true).open(&self.path)?;
            file.lock_exclusive()?;
            if still_current(&file, &self.path)? {
                return Ok(file);
            }
            debug!(path = %self.path.display(), "ledger archived while waiting for lock, reopening");
        }
    }

    /// Walk complete records in order until `f` breaks.
    ///
    /// Returns whether the file ended in a partial record.
    fn visit(&self, mut f: impl FnMut(Record) -> ControlFlow<()>) -> Result<bool, LedgerError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e.into()),
        };
        let mut reader = BufReader::new(file);
        let mut buf = Vec::new();
        let mut line_no = 0;

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                return Ok(false);
            }
            line_no += 1;
            if buf.last() != Some(&b'\n') {
                debug!(path = %self.path.display(), line = line_no, "skipping partial trailing record");
                return Ok(true);
            }
            if buf.iter().all(u8::is_ascii_whitespace) {
                continue;
            }

            let record = match serde_json::from_slice::<LedgerEntry>(&buf) {
                Ok(entry) => Record::Entry(entry),
                Err(e) => {
                    warn!(
                        path = %self.path.display(),
                        line = line_no,
                        error = %e,
                        "skipping corrupt ledger record"
                    );
                    Record::Corrupt(CorruptRecord { line: line_no, error: e.to_string() })
                }
            };
            if f(record).is_break() {
                return Ok(false);
            }
        }
    }
}

/// True if the file is non-empty and its last byte is not a newline.
fn ends_mid_record(file: &mut File) -> io::Result<bool> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(false);
    }
    file.seek(SeekFrom::Start(len - 1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

/// Whether `path` still names the file `file` has open.
#[cfg(unix)]
fn still_current(file: &File, path: &Path) -> io::Result<bool> {
    use std::os::unix::fs::MetadataExt;

    let held = file.metadata()?;
    match fs::metadata(path) {
        Ok(current) => Ok(current.dev() == held.dev() && current.ino() == held.ino()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(not(unix))]
fn still_current(_file: &File, path: &Path) -> io::Result<bool> {
    Ok(path.exists())
}

#[cfg(test)]
#[path = "ledger_tests.rs"]
mod tests;
