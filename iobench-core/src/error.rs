//! Custom error types for iobench.
//!
//! This module defines explicit enum error types as per coding guidelines.
//! No `Box<dyn Error>`, no `anyhow::Result` - all errors are strongly typed.
//!
//! Only structural problems are errors. Missing or malformed per-run logs are
//! not: the extractors degrade to empty results instead (see [`crate::extract`]).

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the analysis engine.
/// All errors are explicit variants - no catch-all or generic handling.
#[derive(Debug, Error)]
pub enum AnalysisError {
    // =========================================================================
    // Structural Errors - Nothing To Aggregate
    // =========================================================================
    #[error("Raw results directory does not exist: {path}")]
    RawRootNotFound { path: PathBuf },

    #[error("Failed to walk results tree at {path}: {message}")]
    Walk { path: PathBuf, message: String },

    // =========================================================================
    // Configuration Errors - Fail-Fast on Invalid Config
    // =========================================================================
    #[error("Hard validation error: {0}")]
    HardValidation(#[from] HardValidationError),

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Configuration parse error: {message}")]
    ConfigParse { message: String },

    // =========================================================================
    // System Errors
    // =========================================================================
    #[error("IO error: {context} - {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Hard validation errors reject a configuration before any run is parsed.
#[derive(Debug, Error)]
pub enum HardValidationError {
    #[error("Missing required field: {field}")]
    MissingRequiredField { field: &'static str },

    #[error("Invalid field value: {field} = {value} - {reason}")]
    InvalidFieldValue {
        field: &'static str,
        value: String,
        reason: String,
    },
}

/// Result type alias using AnalysisError.
pub type AnalysisResult<T> = Result<T, AnalysisError>;
