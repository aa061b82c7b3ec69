// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Grouping of per-run records into summary rows.
//!
//! Records sharing the same experiment parameters (and, for networked runs,
//! the same side) are repeated runs of one configuration. The aggregation is a
//! pure reduction: input order does not matter, output is sorted by group.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::record::MetricRecord;
use crate::stats::{mean_of, SampleStats};
use crate::types::{FileSize, Side};

/// Experiment parameters shared by the records of one group.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupKey {
    pub mechanism: String,
    pub file_size: FileSize,
    pub buffer_size_kb: u32,
    pub sync_mode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
}

impl GroupKey {
    pub fn of(record: &MetricRecord) -> Self {
        Self {
            mechanism: record.key.mechanism.clone(),
            file_size: record.key.file_size.clone(),
            buffer_size_kb: record.key.buffer_size_kb,
            sync_mode: record.key.sync_mode.clone(),
            side: record.side,
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}KB/{}",
            self.mechanism, self.file_size, self.buffer_size_kb, self.sync_mode
        )?;
        if let Some(side) = self.side {
            write!(f, " ({})", side)?;
        }
        Ok(())
    }
}

/// Statistics of one group of repeated runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    #[serde(flatten)]
    pub group: GroupKey,
    /// Records in the group, including those without a usable time
    pub count: usize,
    pub throughput: SampleStats,
    pub time: SampleStats,
    pub mean_cpu_percent: Option<f64>,
    pub mean_user_time_s: Option<f64>,
    pub mean_system_time_s: Option<f64>,
    /// Confidence half-width of the mean throughput
    pub ci95_throughput: Option<f64>,
}

/// Group records and compute per-group statistics.
///
/// `z` scales the confidence interval; 1.96 gives the two-sided 95% interval.
pub fn summarize(records: &[MetricRecord], z: f64) -> Vec<SummaryRow> {
    let mut groups: BTreeMap<GroupKey, Vec<&MetricRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(GroupKey::of(record)).or_default().push(record);
    }

    groups
        .into_iter()
        .map(|(group, members)| {
            let throughput = SampleStats::from_samples(members.iter().map(|r| r.throughput_mb_s));
            let time = SampleStats::from_samples(members.iter().map(|r| r.time_s));
            let excluded = members.len() - throughput.count;
            if excluded > 0 {
                tracing::debug!(
                    group = %group,
                    excluded,
                    "Records without usable throughput left out of statistics"
                );
            }

            SummaryRow {
                count: members.len(),
                ci95_throughput: throughput.confidence_half_width(z),
                throughput,
                time,
                mean_cpu_percent: mean_of(members.iter().map(|r| r.cpu_percent)),
                mean_user_time_s: mean_of(members.iter().map(|r| r.time_user_s)),
                mean_system_time_s: mean_of(members.iter().map(|r| r.time_system_s)),
                group,
            }
        })
        .collect()
}

/// Mean of every numeric column over one group of records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub label: String,
    pub records: usize,
    pub means: BTreeMap<String, f64>,
}

/// Group records by an arbitrary label and average each numeric column.
///
/// A column missing from some records is averaged over the records that
/// carry it. Groups come out sorted by label.
pub fn profile_columns<F>(records: &[MetricRecord], label: F) -> Vec<ColumnProfile>
where
    F: Fn(&MetricRecord) -> String,
{
    let mut groups: BTreeMap<String, (usize, BTreeMap<String, (f64, usize)>)> = BTreeMap::new();

    for record in records {
        let (members, sums) = groups.entry(label(record)).or_default();
        *members += 1;
        for (column, value) in record.numeric_columns() {
            let (sum, n) = sums.entry(column).or_default();
            *sum += value;
            *n += 1;
        }
    }

    groups
        .into_iter()
        .map(|(label, (records, sums))| ColumnProfile {
            label,
            records,
            means: sums
                .into_iter()
                .map(|(column, (sum, n))| (column, sum / n as f64))
                .collect(),
        })
        .collect()
}
