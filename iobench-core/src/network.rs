// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Client/server reconciliation for two-host runs.
//!
//! A networked run directory holds up to two log triples, one per side:
//!
//! ```text
//! run_1/time_client.log  strace_client.log  app_client.log
//! run_1/time_server.log  strace_server.log  app_server.log
//! ```
//!
//! Each side present becomes its own [`MetricRecord`], timed by the duration
//! that side's program reported, or by its own wall clock. The two sides never
//! borrow measurements from each other.

use crate::config::RunLayout;
use crate::locator::LocatedRun;
use crate::record::{side_time_priority, LogBundle, MetricRecord, ParsedBundle};
use crate::types::Side;

/// Splits networked runs into per-side records.
#[derive(Debug)]
pub struct NetworkReconciler<'a> {
    layout: &'a RunLayout,
    mechanism: &'a str,
}

impl<'a> NetworkReconciler<'a> {
    /// `mechanism` is the only mechanism label kept for two-host analysis.
    pub fn new(layout: &'a RunLayout, mechanism: &'a str) -> Self {
        Self { layout, mechanism }
    }

    /// Keep only runs of the networked mechanism. Everything else is dropped
    /// before any log is opened.
    pub fn select(&self, runs: Vec<LocatedRun>) -> Vec<LocatedRun> {
        let total = runs.len();
        let kept: Vec<LocatedRun> = runs
            .into_iter()
            .filter(|run| run.key.mechanism == self.mechanism)
            .collect();
        tracing::debug!(
            mechanism = self.mechanism,
            kept = kept.len(),
            dropped = total - kept.len(),
            "Filtered runs for network analysis"
        );
        kept
    }

    /// One record per side whose resource-usage log exists.
    pub fn reconcile(&self, run: &LocatedRun) -> Vec<MetricRecord> {
        Side::ALL
            .iter()
            .filter_map(|&side| {
                let parsed = ParsedBundle::read(&LogBundle::new(&run.dir, self.layout, Some(side)));
                if parsed.usage.is_missing() {
                    tracing::debug!(run = %run.key, side = %side, "No logs for side");
                    return None;
                }
                Some(MetricRecord::from_parsed(
                    run.key.clone(),
                    Some(side),
                    parsed,
                    side_time_priority(side),
                ))
            })
            .collect()
    }
}
