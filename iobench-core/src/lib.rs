//! IOBench Core Library
//!
//! Log aggregation engine for file I/O and socket transfer benchmarks.
//! Discovers raw run directories, extracts resource-usage, syscall and
//! application metrics from each run, normalizes them into per-run records
//! and reduces repeated runs to summary statistics.

pub mod aggregate;
pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod locator;
pub mod network;
pub mod record;
pub mod report;
pub mod stats;
pub mod types;

// Re-export commonly used types
pub use aggregate::{profile_columns, summarize, ColumnProfile, GroupKey, SummaryRow};
pub use config::{AnalysisConfig, ConfigLoader, RunLayout, Variant};
pub use engine::{analyze, Analysis, Analyzer};
pub use error::{AnalysisError, AnalysisResult, HardValidationError};
pub use locator::{LocatedRun, RunLocator};
pub use network::NetworkReconciler;
pub use record::{MetricRecord, TimeSource};
pub use report::{CsvReporter, ReportError};
pub use stats::SampleStats;
pub use types::{FileSize, RunKey, Side};
