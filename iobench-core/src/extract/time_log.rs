// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Parser for the verbose report written by `/usr/bin/time -v`.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{load, LogOutcome};

/// Resource usage of one benchmark process.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceUsage {
    /// Wall-clock time in seconds
    pub elapsed_s: Option<f64>,
    /// User CPU time in seconds
    pub user_s: Option<f64>,
    /// System CPU time in seconds
    pub system_s: Option<f64>,
    /// CPU utilization, 100 per fully used core
    pub cpu_percent: Option<f64>,
}

struct Patterns {
    elapsed: Regex,
    user: Regex,
    system: Regex,
    cpu: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        elapsed: Regex::new(r"(?m)Elapsed \(wall clock\) time \(h:mm:ss or m:ss\): (.*?)\s*$")
            .expect("elapsed pattern is valid"),
        user: Regex::new(r"(?m)User time \(seconds\): (.*?)\s*$").expect("user pattern is valid"),
        system: Regex::new(r"(?m)System time \(seconds\): (.*?)\s*$")
            .expect("system pattern is valid"),
        cpu: Regex::new(r"(?m)Percent of CPU this job got: (.*?)%").expect("cpu pattern is valid"),
    })
}

fn capture<'a>(re: &Regex, content: &'a str) -> Option<&'a str> {
    re.captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

fn number(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Convert `h:mm:ss[.ff]` or `m:ss[.ff]` to seconds.
///
/// Any other number of components, or a component that is not a number,
/// yields `None`.
pub fn parse_elapsed(value: &str) -> Option<f64> {
    let parts = value
        .trim()
        .split(':')
        .map(|part| part.trim().parse::<f64>().ok())
        .collect::<Option<Vec<f64>>>()?;

    let seconds = match parts.as_slice() {
        [hours, minutes, seconds] => hours * 3600.0 + minutes * 60.0 + seconds,
        [minutes, seconds] => minutes * 60.0 + seconds,
        _ => return None,
    };
    seconds.is_finite().then_some(seconds)
}

/// Extract the fields of interest from a report. Each field is independent:
/// one garbled line does not discard the others.
pub fn parse_time_report(content: &str) -> ResourceUsage {
    let p = patterns();
    ResourceUsage {
        elapsed_s: capture(&p.elapsed, content).and_then(parse_elapsed),
        user_s: capture(&p.user, content).and_then(number),
        system_s: capture(&p.system, content).and_then(number),
        cpu_percent: capture(&p.cpu, content).and_then(number),
    }
}

pub fn read_time_log(path: &Path) -> LogOutcome<ResourceUsage> {
    load(path, parse_time_report)
}
