// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Record normalization.
//!
//! Merges the three extractor outputs of one run (or one side of a networked
//! run) into a flat [`MetricRecord`], picks the authoritative elapsed time and
//! derives throughput from it.
//!
//! # Time resolution
//!
//! Several measurements of the same transfer may exist: the total time the
//! benchmark program reports, a client- or server-specific time it reports
//! instead, and the wall-clock time seen by `/usr/bin/time`. They are tried in
//! a fixed priority order and the first one that is present and numeric wins.
//! The winner is then checked once: unless it is finite and strictly positive
//! the record has no usable time and no throughput. A bad winner never hands
//! over to a lower-priority source.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{LogKind, RunLayout};
use crate::extract::{
    read_app_log, read_strace_log, read_time_log, AppFields, LogOutcome, ResourceUsage,
    SyscallCounts,
};
use crate::types::{RunKey, Side};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Where a record's resolved time came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeSource {
    /// `TimeTaken` reported by the benchmark program
    AppTotal,
    /// `TimeTakenClient` reported by the benchmark program
    AppClient,
    /// `TimeTakenServer` reported by the benchmark program
    AppServer,
    /// Wall-clock time from the resource-usage report
    Elapsed,
}

impl TimeSource {
    /// Application log key holding this measurement, if it is app-reported.
    pub fn app_key(&self) -> Option<&'static str> {
        match self {
            TimeSource::AppTotal => Some("TimeTaken"),
            TimeSource::AppClient => Some("TimeTakenClient"),
            TimeSource::AppServer => Some("TimeTakenServer"),
            TimeSource::Elapsed => None,
        }
    }
}

/// Priority for single-host runs.
pub const LOCAL_TIME_PRIORITY: &[TimeSource] = &[
    TimeSource::AppTotal,
    TimeSource::AppClient,
    TimeSource::Elapsed,
];

/// Priority for one side of a networked run.
pub fn side_time_priority(side: Side) -> &'static [TimeSource] {
    match side {
        Side::Client => &[TimeSource::AppClient, TimeSource::Elapsed],
        Side::Server => &[TimeSource::AppServer, TimeSource::Elapsed],
    }
}

/// A resolved time is usable when it is finite and strictly positive.
pub fn usable_time(seconds: f64) -> Option<f64> {
    (seconds.is_finite() && seconds > 0.0).then_some(seconds)
}

// NaN counts as non-numeric.
fn candidate(source: TimeSource, app: &AppFields, usage: &ResourceUsage) -> Option<f64> {
    match source.app_key() {
        Some(key) => app.number(key),
        None => usage.elapsed_s,
    }
    .filter(|seconds| !seconds.is_nan())
}

/// First present, numeric time in `priority` order, with the source it came
/// from. The value is returned as reported; see [`usable_time`].
pub fn resolve_time(
    priority: &[TimeSource],
    app: &AppFields,
    usage: &ResourceUsage,
) -> Option<(f64, TimeSource)> {
    priority
        .iter()
        .find_map(|source| candidate(*source, app, usage).map(|t| (t, *source)))
}

/// Throughput in MiB/s; `None` unless the result is finite.
pub fn throughput_mb_s(file_size_bytes: u64, time_s: Option<f64>) -> Option<f64> {
    let time_s = time_s?;
    let throughput = file_size_bytes as f64 / BYTES_PER_MB / time_s;
    throughput.is_finite().then_some(throughput)
}

/// Paths of the three logs describing one run or one side of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogBundle {
    pub time: PathBuf,
    pub strace: PathBuf,
    pub app: PathBuf,
}

impl LogBundle {
    pub fn new(dir: &Path, layout: &RunLayout, side: Option<Side>) -> Self {
        Self {
            time: dir.join(layout.file_name(LogKind::ResourceUsage, side)),
            strace: dir.join(layout.file_name(LogKind::SyscallCount, side)),
            app: dir.join(layout.file_name(LogKind::Application, side)),
        }
    }
}

/// Extractor outputs for one [`LogBundle`].
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedBundle {
    pub usage: LogOutcome<ResourceUsage>,
    pub syscalls: LogOutcome<SyscallCounts>,
    pub app: LogOutcome<AppFields>,
}

impl ParsedBundle {
    pub fn read(bundle: &LogBundle) -> Self {
        Self {
            usage: read_time_log(&bundle.time),
            syscalls: read_strace_log(&bundle.strace),
            app: read_app_log(&bundle.app),
        }
    }
}

/// Normalized measurements of one run, or of one side of a networked run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    #[serde(flatten)]
    pub key: RunKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    pub time_elapsed_s: Option<f64>,
    pub time_user_s: Option<f64>,
    pub time_system_s: Option<f64>,
    pub cpu_percent: Option<f64>,
    #[serde(default)]
    pub syscalls: SyscallCounts,
    #[serde(default)]
    pub app: AppFields,
    pub file_size_bytes: u64,
    pub time_s: Option<f64>,
    pub time_source: Option<TimeSource>,
    pub throughput_mb_s: Option<f64>,
}

impl MetricRecord {
    /// Build a record from parsed logs, resolving time with `priority`.
    pub fn from_parsed(
        key: RunKey,
        side: Option<Side>,
        parsed: ParsedBundle,
        priority: &[TimeSource],
    ) -> Self {
        let usage = parsed.usage.into_parsed();
        let syscalls = parsed.syscalls.into_parsed();
        let app = parsed.app.into_parsed();

        let resolved = resolve_time(priority, &app, &usage);
        let time_s = match resolved {
            None => {
                tracing::debug!(run = %key, side = ?side, "No elapsed time for run");
                None
            }
            Some((seconds, source)) => {
                let usable = usable_time(seconds);
                if usable.is_none() {
                    tracing::debug!(
                        run = %key,
                        side = ?side,
                        time_s = seconds,
                        source = ?source,
                        "Resolved time is not positive, throughput undefined"
                    );
                }
                usable
            }
        };
        if let Some((total, TimeSource::AppTotal)) = resolved {
            flag_time_disagreement(&key, total, &app);
        }

        let file_size_bytes = key.file_size.bytes();

        Self {
            side,
            time_elapsed_s: usage.elapsed_s,
            time_user_s: usage.user_s,
            time_system_s: usage.system_s,
            cpu_percent: usage.cpu_percent,
            syscalls,
            app,
            file_size_bytes,
            time_s,
            time_source: resolved.map(|(_, source)| source),
            throughput_mb_s: throughput_mb_s(file_size_bytes, time_s),
            key,
        }
    }

    /// Read and normalize a single-host run.
    pub fn from_run_dir(key: RunKey, dir: &Path, layout: &RunLayout) -> Self {
        let parsed = ParsedBundle::read(&LogBundle::new(dir, layout, None));
        Self::from_parsed(key, None, parsed, LOCAL_TIME_PRIORITY)
    }

    /// Every numeric column of the record, named the way the summary and
    /// profile outputs name them. App fields that do not parse as numbers are
    /// left out.
    pub fn numeric_columns(&self) -> Vec<(String, f64)> {
        let fixed = [
            ("time_elapsed_s", self.time_elapsed_s),
            ("time_user_s", self.time_user_s),
            ("time_system_s", self.time_system_s),
            ("cpu_percent", self.cpu_percent),
            ("time_s", self.time_s),
            ("throughput_mb_s", self.throughput_mb_s),
        ];

        let mut columns: Vec<(String, f64)> = fixed
            .into_iter()
            .filter_map(|(name, value)| value.map(|v| (name.to_string(), v)))
            .collect();
        columns.extend(
            self.syscalls
                .columns()
                .map(|(name, count)| (name, count as f64)),
        );
        columns.extend(self.app.iter().filter_map(|(key, value)| {
            value
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(|v| (key.to_string(), v))
        }));
        columns
    }
}

/// The total time wins over the client time even when both exist; keep a
/// trace when they disagree so the choice can be audited.
fn flag_time_disagreement(key: &RunKey, total: f64, app: &AppFields) {
    let Some(client) = candidate(TimeSource::AppClient, app, &ResourceUsage::default()) else {
        return;
    };
    if (client - total).abs() > f64::EPSILON * total.max(client) {
        tracing::debug!(
            run = %key,
            total_s = total,
            client_s = client,
            "Reported total and client times disagree, keeping total"
        );
    }
}
