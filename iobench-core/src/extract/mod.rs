// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Metric extractors for the three per-run log families.
//!
//! Each extractor is a total function: it never returns an error. A missing
//! file, an unreadable file and a file that matches none of the expected lines
//! are all legitimate inputs, and the caller keeps whatever could be recovered.
//! [`LogOutcome`] keeps "file absent" apart from "file read but field absent".

mod app_log;
mod strace_log;
mod time_log;

use std::io::ErrorKind;
use std::path::Path;

pub use app_log::{parse_app_log, read_app_log, AppFields};
pub use strace_log::{
    parse_strace_summary, read_strace_log, SyscallCounts, SYSCALL_COLUMN_PREFIX,
};
pub use time_log::{parse_elapsed, parse_time_report, read_time_log, ResourceUsage};

/// Outcome of reading one optional log file.
#[derive(Debug, Clone, PartialEq)]
pub enum LogOutcome<T> {
    /// The file does not exist
    Missing,
    /// The file exists but could not be read or decoded
    Unreadable,
    /// The file was read; individual fields may still be absent
    Parsed(T),
}

impl<T> LogOutcome<T> {
    pub fn is_missing(&self) -> bool {
        matches!(self, LogOutcome::Missing)
    }
}

impl<T: Default> LogOutcome<T> {
    /// Parsed contents, or the empty value when the file was not usable.
    pub fn into_parsed(self) -> T {
        match self {
            LogOutcome::Parsed(value) => value,
            _ => T::default(),
        }
    }
}

/// Read a log file as UTF-8 and hand its contents to `parse`.
pub(crate) fn load<T>(path: &Path, parse: impl FnOnce(&str) -> T) -> LogOutcome<T> {
    match std::fs::read_to_string(path) {
        Ok(content) => LogOutcome::Parsed(parse(&content)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "Log file not present");
            LogOutcome::Missing
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable log file");
            LogOutcome::Unreadable
        }
    }
}
