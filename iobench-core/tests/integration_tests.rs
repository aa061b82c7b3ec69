// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! End-to-end integration tests for IOBench.
//!
//! These tests build raw results trees on disk and run the full pipeline from
//! discovery to the written summary.

use std::path::Path;

use iobench_core::{
    analyze, AnalysisConfig, AnalysisError, ConfigLoader, CsvReporter, Side, TimeSource, Variant,
};
use tempfile::TempDir;

const STRACE_SUMMARY: &str = "\
% time     seconds  usecs/call     calls    errors syscall
------ ----------- ----------- --------- --------- ----------------
 60.00    0.060000          37      1600           write
 40.00    0.040000          25      1600           read
------ ----------- ----------- --------- --------- ----------------
100.00    0.100000                  3200           total
";

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn time_log(elapsed: &str) -> String {
    format!(
        "\tCommand being timed: \"./bench\"\n\
         \tUser time (seconds): 0.10\n\
         \tSystem time (seconds): 0.50\n\
         \tPercent of CPU this job got: 30%\n\
         \tElapsed (wall clock) time (h:mm:ss or m:ss): {}\n",
        elapsed
    )
}

#[test]
fn test_single_run_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "buffered/10M/64KB/sync/run_1/time.log", &time_log("0:02.00"));
    write(root, "buffered/10M/64KB/sync/run_1/strace.log", STRACE_SUMMARY);
    write(
        root,
        "buffered/10M/64KB/sync/run_1/app.log",
        "Mechanism: Buffered I/O\nBufferSize: 65536\n",
    );

    let analysis = analyze(&AnalysisConfig::for_raw_dir(root)).unwrap();

    assert_eq!(analysis.records.len(), 1);
    let record = &analysis.records[0];
    assert_eq!(record.key.mechanism, "buffered");
    assert_eq!(record.key.buffer_size_kb, 64);
    assert_eq!(record.key.run_id, 1);
    assert_eq!(record.file_size_bytes, 10 * 1024 * 1024);
    assert_eq!(record.time_s, Some(2.0));
    assert_eq!(record.time_source, Some(TimeSource::Elapsed));
    assert_eq!(record.throughput_mb_s, Some(5.0));
    assert_eq!(record.cpu_percent, Some(30.0));
    assert_eq!(record.syscalls.get("write"), Some(1600));
    assert_eq!(record.app.get("Mechanism"), Some("Buffered I/O"));

    assert_eq!(analysis.summary.len(), 1);
    let row = &analysis.summary[0];
    assert_eq!(row.count, 1);
    assert_eq!(row.throughput.mean, Some(5.0));
    assert_eq!(row.ci95_throughput, None);
}

#[test]
fn test_repeated_runs_are_grouped() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    // 100 MiB in 2s and 2.5s: 50 and 40 MiB/s
    write(root, "mmap/100M/4KB/async/run_1/time.log", &time_log("0:02.00"));
    write(root, "mmap/100M/4KB/async/run_2/time.log", &time_log("0:02.50"));
    write(root, "mmap/1G/4KB/async/run_1/time.log", &time_log("0:10.00"));

    let analysis = analyze(&AnalysisConfig::for_raw_dir(root)).unwrap();
    assert_eq!(analysis.records.len(), 3);
    assert_eq!(analysis.summary.len(), 2);

    let row = analysis
        .summary
        .iter()
        .find(|r| r.group.file_size.as_str() == "100M")
        .unwrap();
    assert_eq!(row.count, 2);
    assert!((row.throughput.mean.unwrap() - 45.0).abs() < 1e-9);
    assert!((row.throughput.std_dev.unwrap() - 50f64.sqrt()).abs() < 1e-9);
    assert!(row.ci95_throughput.is_some());
    assert!((row.time.mean.unwrap() - 2.25).abs() < 1e-9);
}

#[test]
fn test_zero_reported_time_is_excluded_from_throughput() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "sendfile/10M/64KB/sync/run_1/time.log", &time_log("0:02.00"));
    write(root, "sendfile/10M/64KB/sync/run_1/app.log", "TimeTaken: 0\n");
    write(root, "sendfile/10M/64KB/sync/run_2/time.log", &time_log("0:02.00"));

    let analysis = analyze(&AnalysisConfig::for_raw_dir(root)).unwrap();
    assert_eq!(analysis.records.len(), 2);
    assert_eq!(analysis.records[0].throughput_mb_s, None);
    assert_eq!(analysis.records[0].time_source, Some(TimeSource::AppTotal));

    let row = &analysis.summary[0];
    assert_eq!(row.count, 2);
    assert_eq!(row.throughput.count, 1);
    assert_eq!(row.time.count, 1);
    assert_eq!(row.throughput.mean, Some(5.0));
    assert_eq!(row.ci95_throughput, None);
}

#[test]
fn test_malformed_paths_are_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "buffered/10M/64KB/run_1/time.log", &time_log("0:01.00"));
    write(root, "buffered/10M/64KB/sync/run_1/extra/time.log", &time_log("0:01.00"));
    write(root, "buffered/10M/bigKB/sync/run_1/time.log", &time_log("0:01.00"));
    write(root, "buffered/10M/64KB/sync/run_2/time.log", &time_log("0:01.00"));

    let analysis = analyze(&AnalysisConfig::for_raw_dir(root)).unwrap();
    assert_eq!(analysis.records.len(), 1);
    assert_eq!(analysis.records[0].key.run_id, 2);
}

#[test]
fn test_missing_root_fails() {
    let temp_dir = TempDir::new().unwrap();
    let config = AnalysisConfig::for_raw_dir(temp_dir.path().join("does-not-exist"));

    let result = analyze(&config);
    assert!(matches!(result, Err(AnalysisError::RawRootNotFound { .. })));
}

#[test]
fn test_empty_tree_gives_empty_analysis() {
    let temp_dir = TempDir::new().unwrap();
    let analysis = analyze(&AnalysisConfig::for_raw_dir(temp_dir.path())).unwrap();
    assert!(analysis.is_empty());
    assert!(analysis.summary.is_empty());
}

#[test]
fn test_network_server_only_run() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(
        root,
        "tcp_socket/10M/64KB/sync/run_1/time_server.log",
        &time_log("0:04.00"),
    );
    write(
        root,
        "tcp_socket/10M/64KB/sync/run_1/app_server.log",
        "TimeTakenServer: 2.0\n",
    );

    let config = AnalysisConfig::for_raw_dir(root).with_variant(Variant::Network);
    let analysis = analyze(&config).unwrap();

    assert_eq!(analysis.records.len(), 1);
    let record = &analysis.records[0];
    assert_eq!(record.side, Some(Side::Server));
    assert_eq!(record.time_s, Some(2.0));
    assert_eq!(record.time_source, Some(TimeSource::AppServer));
    assert_eq!(analysis.summary[0].group.side, Some(Side::Server));
}

#[test]
fn test_network_ignores_other_mechanisms() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    for mechanism in ["tcp_socket", "unix_socket"] {
        for side in ["client", "server"] {
            write(
                root,
                &format!("{}/1M/8KB/sync/run_1/time_{}.log", mechanism, side),
                &time_log("0:01.00"),
            );
        }
    }

    let config = AnalysisConfig::for_raw_dir(root).with_variant(Variant::Network);
    let analysis = analyze(&config).unwrap();

    assert_eq!(analysis.records.len(), 2);
    assert!(analysis
        .records
        .iter()
        .all(|r| r.key.mechanism == "tcp_socket"));
    assert_eq!(analysis.summary.len(), 2);
}

#[test]
fn test_summary_written_from_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "raw/direct/1M/4KB/sync/run_1/time.log", &time_log("0:01.00"));
    write(root, "raw/direct/1M/4KB/sync/run_2/time.log", &time_log("0:00.50"));

    let yaml = format!(
        "raw_dir: {}\noutput_dir: {}\n",
        root.join("raw").display(),
        root.join("out").display()
    );
    let config_path = root.join("iobench.yaml");
    std::fs::write(&config_path, yaml).unwrap();

    let config = ConfigLoader::load_file(&config_path).unwrap();
    let analysis = analyze(&config).unwrap();
    let reporter = CsvReporter::new(&config.output_dir, config.variant).unwrap();
    let path = reporter.save_summary(&analysis.summary).unwrap();

    assert_eq!(path, root.join("out").join("summary.csv"));
    let content = std::fs::read_to_string(path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("mechanism,file_size,buffer_size_kb,sync_mode,"));
    // 1 and 2 MiB/s
    assert!(lines[1].starts_with("direct,1M,4,sync,1.5,"));
    assert!(lines[1].contains(",2,2,2,"));
}
