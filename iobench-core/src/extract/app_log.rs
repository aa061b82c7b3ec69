// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Parser for the `Key: value` lines the benchmark programs print on stdout.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{load, LogOutcome};

/// Free-form fields reported by a benchmark program, values kept as text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppFields(BTreeMap<String, String>);

impl AppFields {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Numeric value of a field; `None` when absent or not a number.
    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(|value| value.parse::<f64>().ok())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for AppFields {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Split each line on its first colon. Lines without a colon or with an empty
/// key are skipped; a repeated key keeps its last value.
pub fn parse_app_log(content: &str) -> AppFields {
    content
        .lines()
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim(), value.trim()))
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

pub fn read_app_log(path: &Path) -> LogOutcome<AppFields> {
    load(path, parse_app_log)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_program_output() {
        let fields = parse_app_log(
            "Mechanism: Buffered I/O
BufferSize: 65536
SyncMode: sync
TimeTaken: 0.123456
ReadCalls: 160
WriteCalls: 160
",
        );
        assert_eq!(fields.get("Mechanism"), Some("Buffered I/O"));
        assert_eq!(fields.number("TimeTaken"), Some(0.123456));
        assert_eq!(fields.number("ReadCalls"), Some(160.0));
        assert_eq!(fields.len(), 6);
    }

    #[test]
    fn test_split_on_first_colon_only() {
        let fields = parse_app_log("Started: 12:30:01\n");
        assert_eq!(fields.get("Started"), Some("12:30:01"));
        assert_eq!(fields.number("Started"), None);
    }

    #[test]
    fn test_unparsable_lines_are_skipped() {
        let fields = parse_app_log("no separator here\n: orphan value\n\nKey:  spaced  \n");
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get("Key"), Some("spaced"));
    }

    #[test]
    fn test_non_numeric_value() {
        let fields = parse_app_log("TimeTaken: n/a\n");
        assert_eq!(fields.get("TimeTaken"), Some("n/a"));
        assert_eq!(fields.number("TimeTaken"), None);
    }
}
