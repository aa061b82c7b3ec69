// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Persistence of analysis results.
//!
//! The summary is written as CSV, one row per group, with missing values as
//! empty fields. Per-run records can additionally be dumped as JSON for chart
//! tooling.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::aggregate::SummaryRow;
use crate::config::Variant;
use crate::record::MetricRecord;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize records: {0}")]
    Serialization(#[from] serde_json::Error),
}

const GROUP_COLUMNS: [&str; 4] = ["mechanism", "file_size", "buffer_size_kb", "sync_mode"];

const STAT_COLUMNS: [&str; 11] = [
    "mean_throughput_mb_s",
    "std_throughput_mb_s",
    "mean_time_s",
    "std_time_s",
    "mean_cpu_percent",
    "mean_user_time_s",
    "mean_system_time_s",
    "count",
    "throughput_count",
    "time_count",
    "ci95_throughput",
];

/// Header row of the summary for a variant.
pub fn summary_header(variant: Variant) -> String {
    let mut columns: Vec<&str> = GROUP_COLUMNS.to_vec();
    if variant == Variant::Network {
        columns.push("side");
    }
    columns.extend(STAT_COLUMNS);
    columns.join(",")
}

/// Escape CSV field (handle commas, quotes, newlines)
fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Format one summary row; the side column is present for the network variant.
pub fn summary_line(row: &SummaryRow, variant: Variant) -> String {
    let mut fields = vec![
        escape_field(&row.group.mechanism),
        escape_field(row.group.file_size.as_str()),
        row.group.buffer_size_kb.to_string(),
        escape_field(&row.group.sync_mode),
    ];
    if variant == Variant::Network {
        fields.push(row.group.side.map(|s| s.to_string()).unwrap_or_default());
    }
    fields.extend([
        optional(row.throughput.mean),
        optional(row.throughput.std_dev),
        optional(row.time.mean),
        optional(row.time.std_dev),
        optional(row.mean_cpu_percent),
        optional(row.mean_user_time_s),
        optional(row.mean_system_time_s),
        row.count.to_string(),
        row.throughput.count.to_string(),
        row.time.count.to_string(),
        optional(row.ci95_throughput),
    ]);
    fields.join(",")
}

/// Writes summaries and record dumps into an output directory.
pub struct CsvReporter {
    output_dir: PathBuf,
    variant: Variant,
}

impl CsvReporter {
    /// Create a reporter, creating the output directory if needed.
    pub fn new(output_dir: impl AsRef<Path>, variant: Variant) -> Result<Self, ReportError> {
        let output_dir = output_dir.as_ref().to_path_buf();
        fs::create_dir_all(&output_dir)?;
        Ok(Self {
            output_dir,
            variant,
        })
    }

    fn file_name(&self, stem: &str, extension: &str) -> PathBuf {
        let name = match self.variant {
            Variant::Local => format!("{}.{}", stem, extension),
            Variant::Network => format!("{}_network.{}", stem, extension),
        };
        self.output_dir.join(name)
    }

    /// Write the summary CSV. Returns the path of the created file.
    pub fn save_summary(&self, summary: &[SummaryRow]) -> Result<PathBuf, ReportError> {
        let path = self.file_name("summary", "csv");
        let mut writer = BufWriter::new(File::create(&path)?);

        writeln!(writer, "{}", summary_header(self.variant))?;
        for row in summary {
            writeln!(writer, "{}", summary_line(row, self.variant))?;
        }
        writer.flush()?;

        tracing::info!(path = %path.display(), rows = summary.len(), "Summary written");
        Ok(path)
    }

    /// Dump per-run records as pretty JSON. Returns the path of the created file.
    pub fn save_records(&self, records: &[MetricRecord]) -> Result<PathBuf, ReportError> {
        let path = self.file_name("records", "json");
        let writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(writer, records)?;

        tracing::info!(path = %path.display(), records = records.len(), "Records written");
        Ok(path)
    }

    /// Load a record dump written by [`CsvReporter::save_records`].
    pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<MetricRecord>, ReportError> {
        let file = File::open(path)?;
        let records = serde_json::from_reader(file)?;
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::summarize;
    use crate::extract::{AppFields, SyscallCounts};
    use crate::record::{throughput_mb_s, TimeSource};
    use crate::types::{FileSize, RunKey, Side};
    use tempfile::TempDir;

    fn record(run_id: u32, side: Option<Side>, time_s: Option<f64>) -> MetricRecord {
        let key = RunKey {
            mechanism: "tcp_socket".to_string(),
            file_size: FileSize::new("10M"),
            buffer_size_kb: 64,
            sync_mode: "sync".to_string(),
            run_id,
        };
        MetricRecord {
            key,
            side,
            time_elapsed_s: time_s,
            time_user_s: None,
            time_system_s: None,
            cpu_percent: None,
            syscalls: SyscallCounts::default(),
            app: AppFields::default(),
            file_size_bytes: 10 * 1024 * 1024,
            time_s,
            time_source: time_s.map(|_| TimeSource::Elapsed),
            throughput_mb_s: throughput_mb_s(10 * 1024 * 1024, time_s),
        }
    }

    #[test]
    fn test_header_per_variant() {
        assert!(summary_header(Variant::Local).starts_with("mechanism,file_size,buffer_size_kb,sync_mode,mean_"));
        assert!(summary_header(Variant::Network).contains("sync_mode,side,mean_"));
        assert!(summary_header(Variant::Local).ends_with("ci95_throughput"));
    }

    #[test]
    fn test_missing_values_are_empty_fields() {
        let summary = summarize(&[record(1, None, Some(2.0))], 1.96);
        let line = summary_line(&summary[0], Variant::Local);
        assert_eq!(line, "tcp_socket,10M,64,sync,5,,2,,,,,1,1,1,");
    }

    #[test]
    fn test_escape_field() {
        assert_eq!(escape_field("plain"), "plain");
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_save_summary_network() {
        let temp_dir = TempDir::new().unwrap();
        let reporter = CsvReporter::new(temp_dir.path().join("out"), Variant::Network).unwrap();
        let records = vec![
            record(1, Some(Side::Client), Some(2.0)),
            record(1, Some(Side::Server), Some(4.0)),
        ];
        let path = reporter.save_summary(&summarize(&records, 1.96)).unwrap();

        assert!(path.ends_with("summary_network.csv"));
        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("tcp_socket,10M,64,sync,client,5,"));
        assert!(lines[2].starts_with("tcp_socket,10M,64,sync,server,2.5,"));
    }

    #[test]
    fn test_records_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let reporter = CsvReporter::new(temp_dir.path(), Variant::Local).unwrap();
        let records = vec![record(1, None, Some(2.0)), record(2, None, None)];

        let path = reporter.save_records(&records).unwrap();
        assert!(path.ends_with("records.json"));

        let loaded = CsvReporter::load_records(&path).unwrap();
        assert_eq!(loaded, records);
    }
}
