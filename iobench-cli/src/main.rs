// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! IOBench CLI
//!
//! Command-line interface for summarizing raw I/O benchmark results.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

/// IOBench - Summarize file I/O and socket transfer benchmark logs
#[derive(Parser)]
#[command(name = "iobench")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path (defaults are used when omitted)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options selecting which results tree to read.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct Source {
    /// Raw results directory (overrides the configuration)
    #[arg(short, long)]
    pub raw: Option<PathBuf>,

    /// Analyze two-host socket runs (client/server logs)
    #[arg(short, long)]
    pub network: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Aggregate raw runs and write the summary CSV
    Analyze {
        #[command(flatten)]
        source: Source,

        /// Output directory (overrides the configuration)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also dump per-run records as JSON
        #[arg(long)]
        records: bool,
    },

    /// List the runs found in the raw results tree
    List {
        #[command(flatten)]
        source: Source,
    },

    /// Show per-group means of metric columns
    Profile {
        #[command(flatten)]
        source: Source,

        /// Only include runs of this file size label (e.g. 100M)
        #[arg(long)]
        file_size: Option<String>,

        /// Only include runs with this buffer size in KB
        #[arg(long)]
        buffer_size: Option<u32>,

        /// Profile a records JSON written by `analyze --records` instead of
        /// the raw results tree
        #[arg(long, conflicts_with = "raw")]
        from_records: Option<PathBuf>,

        /// Only show columns starting with this prefix
        #[arg(long, default_value = "syscall_")]
        prefix: String,
    },

    /// Validate a configuration file
    Validate {
        /// Path to the configuration file
        file: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    // Dispatch to command handlers
    let config = cli.config.as_deref();
    match cli.command {
        Commands::Analyze {
            source,
            output,
            records,
        } => commands::analyze::execute(config, &source, output, records),
        Commands::List { source } => commands::list::execute(config, &source),
        Commands::Profile {
            source,
            file_size,
            buffer_size,
            from_records,
            prefix,
        } => {
            let filter = commands::profile::ProfileFilter {
                file_size: file_size.as_deref(),
                buffer_size_kb: buffer_size,
            };
            commands::profile::execute(
                config,
                &source,
                from_records.as_deref(),
                &filter,
                &prefix,
            )
        }
        Commands::Validate { file } => commands::validate::execute(&file),
    }
}
