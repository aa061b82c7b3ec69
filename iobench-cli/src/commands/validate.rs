// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `iobench validate` command - Validate configuration file.

use std::path::Path;

use iobench_core::ConfigLoader;

pub fn execute(file: &Path) -> anyhow::Result<()> {
    tracing::info!(file = %file.display(), "Validating configuration");

    match ConfigLoader::load_file(file) {
        Ok(config) => {
            println!("✓ Configuration is valid");
            println!();
            println!("Analysis Settings:");
            println!("  Raw Directory:      {}", config.raw_dir.display());
            println!("  Output Directory:   {}", config.output_dir.display());
            println!("  Variant:            {:?}", config.variant);
            println!("  Network Mechanism:  {}", config.network_mechanism);
            println!("  Confidence z:       {}", config.confidence_z);
            println!();
            println!("Run Layout:");
            let layout = &config.layout;
            println!(
                "  Logs:               {}.{}, {}.{}, {}.{}",
                layout.time_log,
                layout.extension,
                layout.strace_log,
                layout.extension,
                layout.app_log,
                layout.extension
            );
            println!("  Buffer Suffix:      {}", layout.buffer_suffix);
            println!("  Run Prefix:         {}", layout.run_prefix);
            Ok(())
        }
        Err(e) => {
            eprintln!("✗ Configuration validation failed:");
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    }
}
