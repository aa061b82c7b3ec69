// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Parser for the summary table printed by `strace -c`.
//!
//! ```text
//! % time     seconds  usecs/call     calls    errors syscall
//! ------ ----------- ----------- --------- --------- ----------------
//!  62.50    0.000250          15        16           read
//!  37.50    0.000150           9        16           write
//! ------ ----------- ----------- --------- --------- ----------------
//! 100.00    0.000400                    32           total
//! ```
//!
//! Rows are read from the right: the last token is the syscall name and the
//! one before it the call count.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{load, LogOutcome};

/// Shortest data row we accept; anything shorter is a truncated or wrapped line.
const MIN_ROW_TOKENS: usize = 5;

/// Column prefix under which syscall counts appear in records.
pub const SYSCALL_COLUMN_PREFIX: &str = "syscall_";

/// Call count per syscall name, ordered by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SyscallCounts(BTreeMap<String, u64>);

impl SyscallCounts {
    pub fn get(&self, name: &str) -> Option<u64> {
        self.0.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(name, count)| (name.as_str(), *count))
    }

    /// Counts as `syscall_<name>` columns.
    pub fn columns(&self) -> impl Iterator<Item = (String, u64)> + '_ {
        self.iter()
            .map(|(name, count)| (format!("{}{}", SYSCALL_COLUMN_PREFIX, name), count))
    }
}

impl FromIterator<(String, u64)> for SyscallCounts {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn is_header(line: &str) -> bool {
    line.contains("calls") && line.contains("syscall")
}

fn is_separator(line: &str) -> bool {
    line.contains("---")
}

/// Parse the table. Lines before the header row, separator rows, blank lines,
/// short rows and rows whose count is not an integer are ignored. A syscall
/// listed twice keeps its last count.
pub fn parse_strace_summary(content: &str) -> SyscallCounts {
    let mut counts = BTreeMap::new();
    let mut header_found = false;

    for line in content.lines() {
        if is_header(line) {
            header_found = true;
            continue;
        }
        if !header_found || is_separator(line) || line.trim().is_empty() {
            continue;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < MIN_ROW_TOKENS {
            continue;
        }

        let name = tokens[tokens.len() - 1];
        match tokens[tokens.len() - 2].parse::<u64>() {
            Ok(calls) => {
                counts.insert(name.to_string(), calls);
            }
            Err(_) => {
                tracing::trace!(row = line, "Ignoring strace row with non-numeric count");
            }
        }
    }

    SyscallCounts(counts)
}

pub fn read_strace_log(path: &Path) -> LogOutcome<SyscallCounts> {
    load(path, parse_strace_summary)
}
