// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Run discovery.
//!
//! A raw results tree encodes the experiment parameters in its directory
//! names:
//!
//! ```text
//! <raw>/<mechanism>/<file_size>/<buffer_size>KB/<sync_mode>/run_<id>/time.log
//! ```
//!
//! Any directory that directly holds a resource-usage log is a run candidate.
//! Candidates whose relative path does not split into exactly five labels, or
//! whose numeric labels do not parse, are skipped without failing the walk.

use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

use crate::config::{RunLayout, Variant};
use crate::error::{AnalysisError, AnalysisResult};
use crate::types::{FileSize, RunKey};

/// Number of path labels below the raw root that make up a run key.
pub const RUN_PATH_DEPTH: usize = 5;

/// Why a candidate directory is not a run.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathShapeError {
    #[error("expected {expected} path components, found {found}")]
    WrongDepth { expected: usize, found: usize },

    #[error("path component is not valid UTF-8")]
    NonUtf8,

    #[error("{field} label '{label}' is not an unsigned integer")]
    BadNumber { field: &'static str, label: String },
}

/// A discovered run directory and its decoded parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedRun {
    pub key: RunKey,
    pub dir: PathBuf,
}

fn strip_number(
    label: &str,
    affix: &str,
    field: &'static str,
    prefix: bool,
) -> Result<u32, PathShapeError> {
    let bare = if affix.is_empty() {
        label
    } else if prefix {
        label.strip_prefix(affix).unwrap_or(label)
    } else {
        label.strip_suffix(affix).unwrap_or(label)
    };
    bare.parse::<u32>().map_err(|_| PathShapeError::BadNumber {
        field,
        label: label.to_string(),
    })
}

/// Decode a run key from a directory path relative to the raw root.
pub fn decode_run_key(relative: &Path, layout: &RunLayout) -> Result<RunKey, PathShapeError> {
    let labels = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_str().ok_or(PathShapeError::NonUtf8)),
            _ => None,
        })
        .collect::<Result<Vec<&str>, PathShapeError>>()?;

    let [mechanism, file_size, buffer, sync_mode, run] = labels.as_slice() else {
        return Err(PathShapeError::WrongDepth {
            expected: RUN_PATH_DEPTH,
            found: labels.len(),
        });
    };

    Ok(RunKey {
        mechanism: mechanism.to_string(),
        file_size: FileSize::new(*file_size),
        buffer_size_kb: strip_number(buffer, &layout.buffer_suffix, "buffer size", false)?,
        sync_mode: sync_mode.to_string(),
        run_id: strip_number(run, &layout.run_prefix, "run id", true)?,
    })
}

/// Walks a raw results tree and yields its runs.
#[derive(Debug)]
pub struct RunLocator<'a> {
    root: &'a Path,
    layout: &'a RunLayout,
    variant: Variant,
}

impl<'a> RunLocator<'a> {
    pub fn new(root: &'a Path, layout: &'a RunLayout, variant: Variant) -> Self {
        Self {
            root,
            layout,
            variant,
        }
    }

    fn is_run_dir(&self, dir: &Path, markers: &[String]) -> bool {
        markers.iter().any(|marker| dir.join(marker).is_file())
    }

    /// Discover every run below the root, in file-name order.
    ///
    /// Fails only when the root itself is missing or cannot be listed.
    pub fn locate(&self) -> AnalysisResult<Vec<LocatedRun>> {
        if !self.root.is_dir() {
            return Err(AnalysisError::RawRootNotFound {
                path: self.root.to_path_buf(),
            });
        }

        let markers = self.layout.run_markers(self.variant);
        let mut runs = Vec::new();

        for entry in WalkDir::new(self.root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(AnalysisError::Walk {
                        path: self.root.to_path_buf(),
                        message: e.to_string(),
                    });
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unreadable entry in results tree");
                    continue;
                }
            };

            if !entry.file_type().is_dir() || !self.is_run_dir(entry.path(), &markers) {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(self.root)
                .unwrap_or(entry.path());

            match decode_run_key(relative, self.layout) {
                Ok(key) => {
                    tracing::debug!(run = %key, dir = %entry.path().display(), "Found run");
                    runs.push(LocatedRun {
                        key,
                        dir: entry.path().to_path_buf(),
                    });
                }
                Err(e @ PathShapeError::WrongDepth { .. }) => {
                    tracing::debug!(dir = %relative.display(), reason = %e, "Not a run directory");
                }
                Err(e) => {
                    tracing::warn!(dir = %relative.display(), reason = %e, "Skipping run directory");
                }
            }
        }

        tracing::info!(
            root = %self.root.display(),
            runs = runs.len(),
            "Results tree scanned"
        );
        Ok(runs)
    }
}
