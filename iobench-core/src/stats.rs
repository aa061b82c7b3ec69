// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Descriptive statistics over repeated runs.
//!
//! Missing and non-finite samples are dropped before anything is computed,
//! so they never count towards `count` and never drag a mean towards zero.

use serde::{Deserialize, Serialize};

/// Count, mean and sample standard deviation of one column within a group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleStats {
    /// Number of usable samples
    pub count: usize,
    /// Arithmetic mean, `None` without samples
    pub mean: Option<f64>,
    /// Sample standard deviation (n - 1), `None` below two samples
    pub std_dev: Option<f64>,
}

impl SampleStats {
    /// Compute statistics from optional samples.
    pub fn from_samples(samples: impl IntoIterator<Item = Option<f64>>) -> Self {
        let values: Vec<f64> = samples
            .into_iter()
            .flatten()
            .filter(|v| v.is_finite())
            .collect();

        let count = values.len();
        if count == 0 {
            return Self::default();
        }

        let mean = values.iter().sum::<f64>() / count as f64;
        let std_dev = (count > 1).then(|| {
            let variance = values
                .iter()
                .map(|&x| {
                    let diff = x - mean;
                    diff * diff
                })
                .sum::<f64>()
                / (count - 1) as f64;
            variance.sqrt()
        });

        Self {
            count,
            mean: Some(mean),
            std_dev,
        }
    }

    /// Half-width of the normal-approximation confidence interval of the mean,
    /// `z * s / sqrt(n)`. Undefined below two samples.
    pub fn confidence_half_width(&self, z: f64) -> Option<f64> {
        if self.count <= 1 {
            return None;
        }
        self.std_dev.map(|s| z * s / (self.count as f64).sqrt())
    }
}

/// Mean of optional samples, ignoring missing and non-finite values.
pub fn mean_of(samples: impl IntoIterator<Item = Option<f64>>) -> Option<f64> {
    SampleStats::from_samples(samples).mean
}
