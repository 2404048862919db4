// Copyright 2025-2026, Offchain Labs, Inc.
// For license information, see https://github.com/OffchainLabs/nitro/blob/master/LICENSE.md

//! Drives the runner against throw-away shell scripts standing in for the fuzzer.

#![cfg(unix)]

use harness::{
    catalog::{find_config, Study, CONTRACTS, RUN_CONFIGS},
    layout::Layout,
    report,
    result::{DetectionTime, RunStatus},
    runner::{Runner, RunnerConfig},
};
use std::{
    fs,
    os::unix::fs::PermissionsExt,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

const METRICS_LOG: &str = r#"
echo "starting campaign"
echo "[0.5s] state: 2 corpus: 1 memory: 100.0 MB"
echo "[1.0s] state: 8 corpus: 4 memory: 150.5 MB"
echo "objective found" >&2
"#;

fn fake_fuzzer(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("fake-ityfuzz");
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn runner(work: &Path, study: Study, fuzzer: PathBuf) -> Runner {
    let layout = Layout::new(work, study);
    let runner = Runner::new(layout, RunnerConfig::for_study(study, fuzzer));
    runner.prepare().unwrap();
    runner
}

#[test]
fn completed_run_keeps_timeline() {
    let tmp = tempfile::tempdir().unwrap();
    let body = format!(
        "printf '%s\\n' \"$@\" > \"$(dirname \"$0\")/args.txt\"\n{METRICS_LOG}\nexit 3"
    );
    let fuzzer = fake_fuzzer(tmp.path(), &body);
    let runner = runner(tmp.path(), Study::StateOverhead, fuzzer);

    let result = runner
        .run("egd_finance", find_config("ItyFuzz-DF").unwrap())
        .unwrap();

    assert_eq!(result.status, RunStatus::Completed);
    assert_eq!(result.exit_code, Some(3));
    assert!(!result.timeout);
    assert!(!result.oom);
    assert!(result.end_time.is_some());
    assert!(matches!(result.detection_time, Some(DetectionTime::Elapsed(_))));
    assert_eq!(result.exploit_type, None);

    let timestamps: Vec<f64> = result.metrics_timeline.iter().map(|s| s.timestamp).collect();
    assert_eq!(timestamps, [0.5, 1.0]);
    let summary = result.summary.unwrap();
    assert_eq!(summary.max_state_corpus, Some(4));
    assert_eq!(summary.final_memory_mb, Some(150.5));
    assert_eq!(summary.peak_memory_mb, Some(150.5));
    assert_eq!(summary.state_growth_rate, Some(1.5));

    let log = fs::read_to_string(runner.layout().log_path("egd_finance", "ItyFuzz-DF")).unwrap();
    assert!(log.contains("starting campaign"));
    assert!(log.contains("objective found"));

    let contract = runner.layout().contract_path("egd_finance");
    let args = fs::read_to_string(tmp.path().join("args.txt")).unwrap();
    let expected = format!(
        "--contract\n{}\n--evm\n--timeout\n120\n--verbose\n--dataflow\n",
        contract.display()
    );
    assert_eq!(args, expected);
}

#[test]
fn ablation_run_skips_timeline() {
    let tmp = tempfile::tempdir().unwrap();
    let fuzzer = fake_fuzzer(tmp.path(), METRICS_LOG);
    let runner = runner(tmp.path(), Study::Ablation, fuzzer);

    let result = runner.run("n00d_token", &RUN_CONFIGS[0]).unwrap();
    assert_eq!(result.status, RunStatus::Completed);
    assert_eq!(result.exit_code, Some(0));
    assert_eq!(result.exploit_type.as_deref(), Some("various"));
    assert!(result.summary.is_none());
    assert!(result.metrics_timeline.is_empty());
}

#[test]
fn overdue_fuzzer_is_killed() {
    let tmp = tempfile::tempdir().unwrap();
    let fuzzer = fake_fuzzer(tmp.path(), "exec sleep 30");
    let layout = Layout::new(tmp.path(), Study::Ablation);
    let mut config = RunnerConfig::for_study(Study::Ablation, fuzzer);
    config.timeout = Duration::from_secs(1);
    config.grace = Duration::from_millis(500);
    let runner = Runner::new(layout, config);
    runner.prepare().unwrap();

    let start = Instant::now();
    let result = runner.run("bacon_protocol", &RUN_CONFIGS[2]).unwrap();
    let elapsed = start.elapsed();

    assert_eq!(result.status, RunStatus::Timeout);
    assert!(result.timeout);
    assert_eq!(result.detection_time, Some(DetectionTime::Timeout));
    assert_eq!(result.detection_text(), "Timeout");
    assert_eq!(result.exit_code, None);
    assert!(elapsed >= Duration::from_millis(1_500), "{elapsed:?}");
    assert!(elapsed < Duration::from_secs(10), "{elapsed:?}");
}

#[test]
fn memory_limit_flags_oom() {
    let tmp = tempfile::tempdir().unwrap();
    let fuzzer = fake_fuzzer(tmp.path(), METRICS_LOG);
    let layout = Layout::new(tmp.path(), Study::Ablation);

    let mut config = RunnerConfig::for_study(Study::Ablation, &fuzzer);
    config.memory_limit_mb = Some(150.);
    let runner = Runner::new(layout.clone(), config);
    runner.prepare().unwrap();
    let result = runner.run("dvd_unstoppable", &RUN_CONFIGS[0]).unwrap();
    assert_eq!(result.status, RunStatus::Completed);
    assert!(result.oom);
    assert!(result.summary.is_none());

    let mut config = RunnerConfig::for_study(Study::Ablation, &fuzzer);
    config.memory_limit_mb = Some(1024.);
    let runner = Runner::new(layout, config);
    let result = runner.run("dvd_unstoppable", &RUN_CONFIGS[0]).unwrap();
    assert!(!result.oom);
}

#[test]
fn sweep_isolates_failures() {
    let tmp = tempfile::tempdir().unwrap();
    let fuzzer = fake_fuzzer(tmp.path(), "echo fuzzing");
    let runner = runner(tmp.path(), Study::Ablation, fuzzer);

    // a directory where the log should go makes exactly one pair fail
    let blocked = runner.layout().log_path("n00d_token", "ItyFuzz-Rand");
    fs::create_dir_all(&blocked).unwrap();

    let results = runner.sweep().unwrap();
    assert_eq!(results.len(), CONTRACTS.len() * RUN_CONFIGS.len());

    let failed: Vec<_> = results
        .iter()
        .filter(|r| r.status == RunStatus::Error)
        .collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].project, "n00d_token");
    assert_eq!(failed[0].config, "ItyFuzz-Rand");
    assert!(failed[0].error.as_ref().unwrap().contains("failed to open log"));

    let pairs: Vec<(&str, &str)> = results
        .iter()
        .map(|r| (r.project.as_str(), r.config.as_str()))
        .collect();
    assert_eq!(pairs[0], ("dvd_unstoppable", "ItyFuzz"));
    assert_eq!(pairs[1], ("dvd_unstoppable", "ItyFuzz-DF"));
    assert_eq!(pairs[17], ("contract2_undisclosed", "ItyFuzz-Rand"));

    report::save(runner.layout(), &results).unwrap();
    let csv = fs::read_to_string(runner.layout().csv_path()).unwrap();
    assert_eq!(csv.lines().count(), 1 + results.len());
    let loaded = report::load_json(&runner.layout().json_path()).unwrap();
    assert_eq!(loaded.len(), results.len());
    assert_eq!(loaded[8].status, RunStatus::Error);
    assert_eq!(loaded[8].error, failed[0].error);
}

#[test]
fn single_runs_one_pair() {
    let tmp = tempfile::tempdir().unwrap();
    let fuzzer = fake_fuzzer(tmp.path(), "echo fuzzing");
    let layout = Layout::new(tmp.path(), Study::StateOverhead);
    let runner = Runner::new(layout, RunnerConfig::for_study(Study::StateOverhead, fuzzer));

    let result = runner.single("contract1_undisclosed", None).unwrap();
    assert_eq!(result.project, "contract1_undisclosed");
    assert_eq!(result.config, "ItyFuzz");
    assert_eq!(result.status, RunStatus::Completed);
    assert!(runner.layout().contract_path("contract2_undisclosed").exists());
    // a log without metrics still yields a summary, with nothing observed
    let summary = result.summary.unwrap();
    assert_eq!(summary.samples, 0);
    assert_eq!(summary.final_memory_mb, None);
}
