// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `iobench list` command - List discovered runs.

use std::path::Path;

use iobench_core::Analyzer;

use super::resolve_config;
use crate::Source;

pub fn execute(config_path: Option<&Path>, source: &Source) -> anyhow::Result<()> {
    let config = resolve_config(config_path, source)?;
    let runs = Analyzer::new(&config).locate()?;

    if runs.is_empty() {
        println!("No runs found under {}.", config.raw_dir.display());
        return Ok(());
    }

    println!("╔══════════════════════════════════════════════════════════════════════════════╗");
    println!("║                               DISCOVERED RUNS                                ║");
    println!("╠═══════════════════╦════════════╦════════════╦═══════════════════╦═══════════╣");
    println!("║ Mechanism         ║ File Size  ║ Buffer     ║ Sync Mode         ║ Run       ║");
    println!("╠═══════════════════╬════════════╬════════════╬═══════════════════╬═══════════╣");

    for run in &runs {
        println!(
            "║ {:<17} ║ {:<10} ║ {:<10} ║ {:<17} ║ {:<9} ║",
            run.key.mechanism,
            run.key.file_size.as_str(),
            format!("{}KB", run.key.buffer_size_kb),
            run.key.sync_mode,
            run.key.run_id
        );
    }

    println!("╚═══════════════════╩════════════╩════════════╩═══════════════════╩═══════════╝");
    println!();
    println!("Total: {} run(s)", runs.len());

    Ok(())
}
