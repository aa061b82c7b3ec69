// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Newtype wrappers and keys shared across the pipeline.
//!
//! A run is identified by the five parameters encoded in its directory path.
//! The file size keeps its human-readable label (`10M`, `1G`) so that grouping
//! and reporting use the same spelling as the results tree.

use std::fmt;

use serde::{Deserialize, Serialize};

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;
const GIB: u64 = 1024 * 1024 * 1024;

/// Human-readable file size label such as `10M` or `512K`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileSize(String);

impl FileSize {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert the label to a byte count.
    ///
    /// The leading digit run is scaled by the unit named in the label's last
    /// character: `K`, `M` or `G` (binary multiples, case-insensitive). Any
    /// other trailing character scales by 1. A label with no leading digits
    /// is 0 bytes. Counts too large for `u64` saturate at `u64::MAX`.
    pub fn bytes(&self) -> u64 {
        let count = self
            .0
            .bytes()
            .take_while(u8::is_ascii_digit)
            .fold(0u64, |acc, digit| {
                acc.saturating_mul(10).saturating_add(u64::from(digit - b'0'))
            });

        let multiplier = match self.0.chars().last().map(|c| c.to_ascii_uppercase()) {
            Some('K') => KIB,
            Some('M') => MIB,
            Some('G') => GIB,
            _ => 1,
        };
        count.saturating_mul(multiplier)
    }
}

impl fmt::Display for FileSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Experiment parameters decoded from a run directory path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RunKey {
    pub mechanism: String,
    pub file_size: FileSize,
    pub buffer_size_kb: u32,
    pub sync_mode: String,
    pub run_id: u32,
}

impl fmt::Display for RunKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}KB/{}/run_{}",
            self.mechanism, self.file_size, self.buffer_size_kb, self.sync_mode, self.run_id
        )
    }
}

/// Which host of a networked run a measurement belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Sending host
    Client,
    /// Receiving host
    Server,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Client, Side::Server];

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Client => "client",
            Side::Server => "server",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_size_units() {
        assert_eq!(FileSize::new("512K").bytes(), 512 * 1024);
        assert_eq!(FileSize::new("10M").bytes(), 10 * 1024 * 1024);
        assert_eq!(FileSize::new("1G").bytes(), 1024 * 1024 * 1024);
        assert_eq!(FileSize::new("100m").bytes(), 100 * 1024 * 1024);
    }

    #[test]
    fn test_file_size_unknown_unit_scales_by_one() {
        assert_eq!(FileSize::new("10X").bytes(), 10);
        assert_eq!(FileSize::new("4096").bytes(), 4096);
    }

    #[test]
    fn test_file_size_without_leading_digits_is_zero() {
        assert_eq!(FileSize::new("M10").bytes(), 0);
        assert_eq!(FileSize::new("").bytes(), 0);
        assert_eq!(FileSize::new("big").bytes(), 0);
    }

    #[test]
    fn test_file_size_overflow_saturates() {
        let label = FileSize::new("99999999999999999999999M");
        assert_eq!(label.bytes(), u64::MAX);
        assert_eq!(FileSize::new("18446744073709551615").bytes(), u64::MAX);
    }

    #[test]
    fn test_run_key_display_matches_layout() {
        let key = RunKey {
            mechanism: "buffered".to_string(),
            file_size: FileSize::new("10M"),
            buffer_size_kb: 64,
            sync_mode: "sync".to_string(),
            run_id: 3,
        };
        assert_eq!(key.to_string(), "buffered/10M/64KB/sync/run_3");
    }

    #[test]
    fn test_side_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Side::Client).unwrap(), "\"client\"");
        assert_eq!(Side::Server.to_string(), "server");
    }
}
