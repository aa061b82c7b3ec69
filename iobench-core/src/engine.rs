// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! End-to-end analysis pipeline.
//!
//! Locate runs, parse and normalize each of them, then reduce the records to
//! summary rows. Per-run work only touches that run's own files, so it is
//! spread over the rayon pool; records are collected in locator order before
//! the aggregation starts.

use rayon::prelude::*;

use crate::aggregate::{summarize, SummaryRow};
use crate::config::{AnalysisConfig, Variant};
use crate::error::AnalysisResult;
use crate::locator::{LocatedRun, RunLocator};
use crate::network::NetworkReconciler;
use crate::record::MetricRecord;

/// Output of one analysis.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub variant: Variant,
    /// One record per run, or per run side for networked runs
    pub records: Vec<MetricRecord>,
    /// One row per experiment group, sorted by group
    pub summary: Vec<SummaryRow>,
}

impl Analysis {
    /// True when no run was found at all.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Runs the pipeline for one configuration.
pub struct Analyzer<'a> {
    config: &'a AnalysisConfig,
}

impl<'a> Analyzer<'a> {
    pub fn new(config: &'a AnalysisConfig) -> Self {
        Self { config }
    }

    fn reconciler(&self) -> NetworkReconciler<'a> {
        NetworkReconciler::new(&self.config.layout, &self.config.network_mechanism)
    }

    /// Runs that take part in the analysis. For the network variant, runs of
    /// other mechanisms are already dropped.
    pub fn locate(&self) -> AnalysisResult<Vec<LocatedRun>> {
        let runs = RunLocator::new(
            &self.config.raw_dir,
            &self.config.layout,
            self.config.variant,
        )
        .locate()?;

        Ok(match self.config.variant {
            Variant::Local => runs,
            Variant::Network => self.reconciler().select(runs),
        })
    }

    /// Parse and normalize already located runs.
    pub fn records(&self, runs: &[LocatedRun]) -> Vec<MetricRecord> {
        match self.config.variant {
            Variant::Local => runs
                .par_iter()
                .map(|run| MetricRecord::from_run_dir(run.key.clone(), &run.dir, &self.config.layout))
                .collect(),
            Variant::Network => {
                let reconciler = self.reconciler();
                runs.par_iter()
                    .flat_map_iter(|run| reconciler.reconcile(run))
                    .collect()
            }
        }
    }

    /// Full pipeline. Fails only when the raw results root is unusable.
    pub fn run(&self) -> AnalysisResult<Analysis> {
        let runs = self.locate()?;
        let records = self.records(&runs);

        if records.is_empty() {
            tracing::info!(
                root = %self.config.raw_dir.display(),
                "No benchmark runs found, nothing to summarize"
            );
            return Ok(Analysis {
                variant: self.config.variant,
                records,
                summary: Vec::new(),
            });
        }

        let summary = summarize(&records, self.config.confidence_z);
        tracing::info!(
            runs = runs.len(),
            records = records.len(),
            groups = summary.len(),
            "Analysis complete"
        );

        Ok(Analysis {
            variant: self.config.variant,
            records,
            summary,
        })
    }
}

/// Convenience wrapper around [`Analyzer::run`].
pub fn analyze(config: &AnalysisConfig) -> AnalysisResult<Analysis> {
    Analyzer::new(config).run()
}
