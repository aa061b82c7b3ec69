// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! YAML configuration parser with strict schema validation.
//!
//! Every knob the pipeline depends on (where the raw tree lives, how its log
//! files are named, which mechanism the network analysis keeps) is carried
//! here and handed to the components explicitly. Any invalid field results in
//! a HardValidationError before a single run is parsed.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult, HardValidationError};
use crate::types::Side;

/// Which family of experiments is being analyzed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Single-host runs with one log triple per run
    #[default]
    Local,
    /// Two-host TCP runs with a client and a server log triple per run
    Network,
}

/// The three log families written per run (or per side).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogKind {
    /// `/usr/bin/time -v` report
    ResourceUsage,
    /// `strace -c` summary table
    SyscallCount,
    /// `key: value` lines printed by the benchmark program
    Application,
}

/// Naming scheme of a raw results tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunLayout {
    pub time_log: String,
    pub strace_log: String,
    pub app_log: String,
    pub extension: String,
    pub buffer_suffix: String,
    pub run_prefix: String,
}

impl Default for RunLayout {
    fn default() -> Self {
        Self {
            time_log: "time".to_string(),
            strace_log: "strace".to_string(),
            app_log: "app".to_string(),
            extension: "log".to_string(),
            buffer_suffix: "KB".to_string(),
            run_prefix: "run_".to_string(),
        }
    }
}

impl RunLayout {
    fn stem(&self, kind: LogKind) -> &str {
        match kind {
            LogKind::ResourceUsage => &self.time_log,
            LogKind::SyscallCount => &self.strace_log,
            LogKind::Application => &self.app_log,
        }
    }

    /// File name of a log: `time.log` for a single-host run, `time_client.log`
    /// for one side of a networked run.
    pub fn file_name(&self, kind: LogKind, side: Option<Side>) -> String {
        match side {
            Some(side) => format!("{}_{}.{}", self.stem(kind), side, self.extension),
            None => format!("{}.{}", self.stem(kind), self.extension),
        }
    }

    /// Resource-usage logs whose presence marks a directory as a run.
    pub fn run_markers(&self, variant: Variant) -> Vec<String> {
        match variant {
            Variant::Local => vec![self.file_name(LogKind::ResourceUsage, None)],
            Variant::Network => Side::ALL
                .iter()
                .map(|side| self.file_name(LogKind::ResourceUsage, Some(*side)))
                .collect(),
        }
    }
}

/// Raw configuration as parsed from YAML (before validation).
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default = "default_raw_dir")]
    raw_dir: String,
    #[serde(default = "default_output_dir")]
    output_dir: String,
    #[serde(default)]
    variant: Variant,
    #[serde(default = "default_network_mechanism")]
    network_mechanism: String,
    #[serde(default = "default_confidence_z")]
    confidence_z: f64,
    #[serde(default)]
    layout: RunLayout,
}

fn default_raw_dir() -> String {
    "results/raw".to_string()
}

fn default_output_dir() -> String {
    "results".to_string()
}

fn default_network_mechanism() -> String {
    "tcp_socket".to_string()
}

fn default_confidence_z() -> f64 {
    1.96 // two-sided 95% under a normal approximation
}

/// Validated analysis configuration.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub raw_dir: PathBuf,
    pub output_dir: PathBuf,
    pub variant: Variant,
    pub network_mechanism: String,
    pub confidence_z: f64,
    pub layout: RunLayout,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            raw_dir: PathBuf::from(default_raw_dir()),
            output_dir: PathBuf::from(default_output_dir()),
            variant: Variant::default(),
            network_mechanism: default_network_mechanism(),
            confidence_z: default_confidence_z(),
            layout: RunLayout::default(),
        }
    }
}

impl AnalysisConfig {
    /// Defaults rooted at the given raw results directory.
    pub fn for_raw_dir(raw_dir: impl Into<PathBuf>) -> Self {
        Self {
            raw_dir: raw_dir.into(),
            ..Self::default()
        }
    }

    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }
}

/// Configuration loader with strict validation.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate configuration from a YAML file.
    pub fn load_file(path: impl AsRef<Path>) -> AnalysisResult<AnalysisConfig> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(AnalysisError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| AnalysisError::Io {
            context: "reading config file",
            source: e,
        })?;

        Self::load_string(&content)
    }

    /// Load and validate configuration from a YAML string.
    pub fn load_string(content: &str) -> AnalysisResult<AnalysisConfig> {
        let raw: RawConfig =
            serde_yaml::from_str(content).map_err(|e| AnalysisError::ConfigParse {
                message: format!("YAML parse error: {}", e),
            })?;

        Self::validate(raw)
    }

    fn validate(raw: RawConfig) -> AnalysisResult<AnalysisConfig> {
        if raw.raw_dir.trim().is_empty() {
            return Err(HardValidationError::MissingRequiredField { field: "raw_dir" }.into());
        }

        if raw.output_dir.trim().is_empty() {
            return Err(HardValidationError::MissingRequiredField {
                field: "output_dir",
            }
            .into());
        }

        if raw.network_mechanism.trim().is_empty() {
            return Err(HardValidationError::MissingRequiredField {
                field: "network_mechanism",
            }
            .into());
        }

        if !raw.confidence_z.is_finite() || raw.confidence_z <= 0.0 {
            return Err(HardValidationError::InvalidFieldValue {
                field: "confidence_z",
                value: raw.confidence_z.to_string(),
                reason: "Must be a positive finite number".to_string(),
            }
            .into());
        }

        Self::validate_layout(&raw.layout)?;

        Ok(AnalysisConfig {
            raw_dir: PathBuf::from(raw.raw_dir),
            output_dir: PathBuf::from(raw.output_dir),
            variant: raw.variant,
            network_mechanism: raw.network_mechanism,
            confidence_z: raw.confidence_z,
            layout: raw.layout,
        })
    }

    fn validate_layout(layout: &RunLayout) -> Result<(), HardValidationError> {
        let names = [
            ("layout.time_log", &layout.time_log),
            ("layout.strace_log", &layout.strace_log),
            ("layout.app_log", &layout.app_log),
            ("layout.extension", &layout.extension),
        ];

        for (field, value) in names {
            if value.is_empty() {
                return Err(HardValidationError::InvalidFieldValue {
                    field,
                    value: String::new(),
                    reason: "Log file names cannot be empty".to_string(),
                });
            }
            if value.contains('/') || value.contains(std::path::MAIN_SEPARATOR) {
                return Err(HardValidationError::InvalidFieldValue {
                    field,
                    value: value.clone(),
                    reason: "Log file names cannot contain path separators".to_string(),
                });
            }
        }

        if layout.time_log == layout.strace_log
            || layout.time_log == layout.app_log
            || layout.strace_log == layout.app_log
        {
            return Err(HardValidationError::InvalidFieldValue {
                field: "layout",
                value: format!(
                    "{}, {}, {}",
                    layout.time_log, layout.strace_log, layout.app_log
                ),
                reason: "Each log family needs its own file name".to_string(),
            });
        }

        Ok(())
    }
}
