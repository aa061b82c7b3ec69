// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `iobench analyze` command - Aggregate runs into a summary.

use std::path::{Path, PathBuf};

use anyhow::Context;
use iobench_core::{analyze, CsvReporter, SummaryRow};

use super::{cell, resolve_config};
use crate::Source;

pub fn execute(
    config_path: Option<&Path>,
    source: &Source,
    output: Option<PathBuf>,
    records: bool,
) -> anyhow::Result<()> {
    let mut config = resolve_config(config_path, source)?;
    if let Some(output) = output {
        config.output_dir = output;
    }

    tracing::info!(raw_dir = %config.raw_dir.display(), "Analyzing benchmark results");
    let analysis = analyze(&config)?;

    if analysis.is_empty() {
        println!("No runs found under {}.", config.raw_dir.display());
        return Ok(());
    }

    print_summary(&analysis.summary);

    let reporter = CsvReporter::new(&config.output_dir, analysis.variant)
        .with_context(|| format!("creating output directory {}", config.output_dir.display()))?;
    let summary_path = reporter.save_summary(&analysis.summary)?;
    println!();
    println!("Summary written to {}", summary_path.display());

    if records {
        let records_path = reporter.save_records(&analysis.records)?;
        println!("Records written to {}", records_path.display());
    }

    Ok(())
}

fn print_summary(summary: &[SummaryRow]) {
    println!("╔══════════════════════════════════════════════════════════════════════════════╗");
    println!("║                              BENCHMARK SUMMARY                               ║");
    println!("╠══════════════════════════════════╦═══════╦══════════════╦══════════╦═════════╣");
    println!("║ Group                            ║ Runs  ║ MB/s         ║ ± CI95   ║ Time s  ║");
    println!("╠══════════════════════════════════╬═══════╬══════════════╬══════════╬═════════╣");

    for row in summary {
        println!(
            "║ {:<32} ║ {:<5} ║ {:<12} ║ {:<8} ║ {:<7} ║",
            row.group.to_string(),
            row.count,
            cell(row.throughput.mean),
            cell(row.ci95_throughput),
            cell(row.time.mean),
        );
    }

    println!("╚══════════════════════════════════╩═══════╩══════════════╩══════════╩═════════╝");
    println!();
    println!("Total: {} group(s)", summary.len());
}
