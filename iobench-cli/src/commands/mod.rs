// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! CLI command modules.

pub mod analyze;
pub mod list;
pub mod profile;
pub mod validate;

use std::path::Path;

use anyhow::Context;
use iobench_core::{AnalysisConfig, ConfigLoader, Variant};

use crate::Source;

/// Load the configuration file if one was given, then apply command-line
/// overrides.
pub fn resolve_config(path: Option<&Path>, source: &Source) -> anyhow::Result<AnalysisConfig> {
    let mut config = match path {
        Some(path) => ConfigLoader::load_file(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => AnalysisConfig::default(),
    };

    if let Some(raw) = &source.raw {
        config.raw_dir = raw.clone();
    }
    if source.network {
        config.variant = Variant::Network;
    }

    tracing::debug!(
        raw_dir = %config.raw_dir.display(),
        variant = ?config.variant,
        "Configuration resolved"
    );
    Ok(config)
}

/// Format an optional number for table output.
pub fn cell(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.2}", v))
        .unwrap_or_else(|| "-".to_string())
}
