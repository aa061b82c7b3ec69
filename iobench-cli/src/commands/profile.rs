// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `iobench profile` command - Per-group means of metric columns.
//!
//! Networked records are grouped by side, everything else by mechanism.

use std::path::Path;

use anyhow::Context;
use iobench_core::{profile_columns, Analyzer, CsvReporter, MetricRecord};

use super::{cell, resolve_config};
use crate::Source;

/// Which records to profile.
#[derive(Debug, Default)]
pub struct ProfileFilter<'a> {
    pub file_size: Option<&'a str>,
    pub buffer_size_kb: Option<u32>,
}

impl ProfileFilter<'_> {
    fn matches(&self, record: &MetricRecord) -> bool {
        self.file_size
            .map_or(true, |size| record.key.file_size.as_str() == size)
            && self
                .buffer_size_kb
                .map_or(true, |kb| record.key.buffer_size_kb == kb)
    }
}

fn label(record: &MetricRecord) -> String {
    match record.side {
        Some(side) => side.to_string(),
        None => record.key.mechanism.clone(),
    }
}

pub fn execute(
    config_path: Option<&Path>,
    source: &Source,
    records_file: Option<&Path>,
    filter: &ProfileFilter<'_>,
    prefix: &str,
) -> anyhow::Result<()> {
    let records = match records_file {
        Some(path) => CsvReporter::load_records(path)
            .with_context(|| format!("loading records from {}", path.display()))?,
        None => {
            let config = resolve_config(config_path, source)?;
            let analyzer = Analyzer::new(&config);
            let runs = analyzer.locate()?;
            analyzer.records(&runs)
        }
    };

    let records: Vec<MetricRecord> = records.into_iter().filter(|r| filter.matches(r)).collect();
    if records.is_empty() {
        println!("No matching records.");
        return Ok(());
    }

    for profile in &profile_columns(&records, label) {
        println!("{} ({} record(s))", profile.label, profile.records);
        let columns: Vec<(&String, &f64)> = profile
            .means
            .iter()
            .filter(|(column, _)| column.starts_with(prefix))
            .collect();
        if columns.is_empty() {
            println!("  (no columns matching '{}')", prefix);
        }
        for (column, mean) in columns {
            println!("  {:<32} {:>14}", column, cell(Some(*mean)));
        }
        println!();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use iobench_core::{AnalysisConfig, Side};

    fn records(root: &Path) -> Vec<MetricRecord> {
        for (dir, size, buffer) in [("a", "10M", "64KB"), ("b", "10M", "4KB"), ("c", "1G", "64KB")] {
            let run = root.join(dir).join(size).join(buffer).join("sync").join("run_1");
            std::fs::create_dir_all(&run).unwrap();
            std::fs::write(run.join("time.log"), "").unwrap();
        }
        let config = AnalysisConfig::for_raw_dir(root);
        let analyzer = Analyzer::new(&config);
        analyzer.records(&analyzer.locate().unwrap())
    }

    #[test]
    fn test_filter_on_file_and_buffer_size() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let records = records(temp_dir.path());
        assert_eq!(records.len(), 3);

        let filter = ProfileFilter {
            file_size: Some("10M"),
            buffer_size_kb: Some(64),
        };
        let kept: Vec<&MetricRecord> = records.iter().filter(|r| filter.matches(r)).collect();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].key.mechanism, "a");

        let everything = ProfileFilter::default();
        assert!(records.iter().all(|r| everything.matches(r)));
    }

    #[test]
    fn test_label_prefers_side() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let mut records = records(temp_dir.path());
        assert_eq!(label(&records[0]), "a");
        records[0].side = Some(Side::Client);
        assert_eq!(label(&records[0]), "client");
    }
}
