// Copyright 2025-2026, Offchain Labs, Inc.
// For license information, see https://github.com/OffchainLabs/nitro/blob/master/LICENSE.md

//! Fuzzer process driver.
//!
//! Each (contract, config) pair is one child process of the external fuzzer. Its stdout and
//! stderr both go to a dedicated log file, which is scraped once the child is gone. The
//! child gets `timeout + grace` of wall time from launch; after that it is killed. Pairs run
//! strictly one after another, contract-major, so fuzzer instances never compete for the
//! machine.

use crate::{
    catalog::{self, RunConfig, Study, CONTRACTS, DEFAULT_CONFIG, RUN_CONFIGS},
    fixtures,
    layout::Layout,
    result::RunResult,
    scrape,
    summary::MetricsSummary,
};
use benchutil::{format, Marker};
use chrono::Local;
use std::{
    fs::File,
    io,
    path::{Path, PathBuf},
    process::{Child, Command, ExitStatus, Stdio},
    thread::sleep,
    time::{Duration, Instant},
};
use thiserror::Error;
use tracing::{debug, info, warn};

pub const DEFAULT_FUZZER: &str = "ityfuzz";
/// Time past the fuzzer's own timeout allowed for it to shut down cleanly.
pub const DEFAULT_GRACE: Duration = Duration::from_secs(10);
const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Error, Debug)]
pub enum RunError {
    #[error("contract not found: {}", .0.display())]
    MissingFixture(PathBuf),
    #[error("unknown contract `{0}`, available: {}", CONTRACTS.join(", "))]
    UnknownContract(String),
    #[error("unknown config `{0}`, available: {}", config_names().join(", "))]
    UnknownConfig(String),
    #[error("failed to prepare fixtures: {0}")]
    Prepare(#[from] io::Error),
    #[error("failed to open log {}: {source}", .path.display())]
    Log {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to launch `{}`: {source}", .fuzzer.display())]
    Spawn {
        fuzzer: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to wait for fuzzer: {0}")]
    Wait(#[source] io::Error),
    #[error("failed to kill fuzzer: {0}")]
    Kill(#[source] io::Error),
}

#[derive(Clone, Debug)]
pub struct RunnerConfig {
    pub fuzzer: PathBuf,
    /// Passed to the fuzzer as `--timeout`.
    pub timeout: Duration,
    pub grace: Duration,
    pub verbose: bool,
    /// Keep the scraped timeline and its summary in each result.
    pub keep_timeline: bool,
    pub memory_limit_mb: Option<f64>,
}

impl RunnerConfig {
    pub fn for_study(study: Study, fuzzer: impl Into<PathBuf>) -> Self {
        Self {
            fuzzer: fuzzer.into(),
            timeout: study.default_timeout(),
            grace: DEFAULT_GRACE,
            verbose: study.verbose(),
            keep_timeline: study.keeps_timeline(),
            memory_limit_mb: None,
        }
    }

    /// Wall-clock budget measured from launch.
    pub fn deadline(&self) -> Duration {
        self.timeout + self.grace
    }
}

enum Outcome {
    Exited { elapsed: Duration, status: ExitStatus },
    TimedOut,
}

#[derive(Debug)]
pub struct Runner {
    layout: Layout,
    config: RunnerConfig,
}

impl Runner {
    pub fn new(layout: Layout, config: RunnerConfig) -> Self {
        Self { layout, config }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Creates the results tree and any missing fixtures.
    pub fn prepare(&self) -> io::Result<()> {
        self.layout.create()?;
        fixtures::generate(&self.layout.contracts_dir, self.layout.study.fixture_set())?;
        Ok(())
    }

    pub fn command(&self, contract_path: &Path, config: &RunConfig) -> Command {
        let mut cmd = Command::new(&self.config.fuzzer);
        cmd.arg("--contract")
            .arg(contract_path)
            .arg("--evm")
            .arg("--timeout")
            .arg(self.config.timeout.as_secs().to_string());
        if self.config.verbose {
            cmd.arg("--verbose");
        }
        cmd.args(config.args);
        cmd
    }

    /// Runs one pair. Only a missing fixture is returned as an error; anything that goes
    /// wrong with the process itself is recorded in the result so a sweep carries on.
    pub fn run(&self, contract: &str, config: &RunConfig) -> Result<RunResult, RunError> {
        let contract_path = self.layout.contract_path(contract);
        if !contract_path.exists() {
            return Err(RunError::MissingFixture(contract_path));
        }
        let log_path = self.layout.log_path(contract, config.name);

        info!("{} Running: {contract} with {}", Marker::Step, config.name);
        let mut result = RunResult::new(contract, config.name, self.layout.study);

        match self.execute(&contract_path, &log_path, config) {
            Ok(Outcome::Exited { elapsed, status }) => {
                debug!("fuzzer exited with {status} after {}", format::seconds(elapsed));
                result.complete(elapsed, status.code());
            }
            Ok(Outcome::TimedOut) => result.time_out(),
            Err(err) => {
                warn!("{} Error running {contract}: {err}", Marker::Fail);
                result.fail(&err);
                return Ok(result);
            }
        }

        if self.config.keep_timeline || self.config.memory_limit_mb.is_some() {
            self.collect_metrics(&log_path, &mut result);
        }
        result.end_time = Some(Local::now());

        info!(
            "{} Completed: {contract} ({})",
            Marker::Done,
            result.detection_text()
        );
        if let Some(summary) = &result.summary {
            info!("    Max state corpus: {}", display_or_dash(summary.max_state_corpus));
            info!(
                "    Final memory: {} MB",
                display_or_dash(summary.final_memory_mb.map(|mb| format!("{mb:.1}")))
            );
        }
        Ok(result)
    }

    /// Runs one pair named on the command line. `config` defaults to the baseline.
    pub fn single(&self, contract: &str, config: Option<&str>) -> Result<RunResult, RunError> {
        let contract = catalog::find_contract(contract)
            .ok_or_else(|| RunError::UnknownContract(contract.to_owned()))?;
        let config = config.unwrap_or(DEFAULT_CONFIG);
        let config =
            catalog::find_config(config).ok_or_else(|| RunError::UnknownConfig(config.to_owned()))?;

        self.prepare()?;
        self.run(contract, config)
    }

    /// Runs the whole catalog matrix in order.
    pub fn sweep(&self) -> io::Result<Vec<RunResult>> {
        let study = self.layout.study;
        println!("\n{}", "=".repeat(70));
        println!("{}", study.title());
        println!("{}\n", "=".repeat(70));

        self.prepare()?;

        let total = CONTRACTS.len() * RUN_CONFIGS.len();
        info!("{} Total tests: {total}", Marker::Step);
        info!(
            "{} Timeout per contract: {}s",
            Marker::Step,
            self.config.timeout.as_secs()
        );

        let mut results = Vec::with_capacity(total);
        let mut current = 0;
        for contract in CONTRACTS {
            for config in &RUN_CONFIGS {
                current += 1;
                info!("{} Test {current}/{total}", Marker::Step);
                match self.run(contract, config) {
                    Ok(result) => results.push(result),
                    Err(err) => warn!("{} {err}", Marker::Fail),
                }
            }
        }
        Ok(results)
    }

    fn execute(
        &self,
        contract_path: &Path,
        log_path: &Path,
        config: &RunConfig,
    ) -> Result<Outcome, RunError> {
        let log_error = |source| RunError::Log {
            path: log_path.to_owned(),
            source,
        };
        let stdout = File::create(log_path).map_err(log_error)?;
        let stderr = stdout.try_clone().map_err(log_error)?;

        let mut cmd = self.command(contract_path, config);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr));
        debug!("Executing fuzzer command: {:?}", cmd);

        let start = Instant::now();
        let mut child = cmd.spawn().map_err(|source| RunError::Spawn {
            fuzzer: self.config.fuzzer.clone(),
            source,
        })?;

        let waited = match wait_until(&mut child, start + self.config.deadline()) {
            Ok(waited) => waited,
            Err(err) => {
                if let Err(cleanup) = terminate(&mut child) {
                    warn!("{} {cleanup}", Marker::Fail);
                }
                return Err(RunError::Wait(err));
            }
        };
        match waited {
            Some(status) => Ok(Outcome::Exited {
                elapsed: start.elapsed(),
                status,
            }),
            None => {
                warn!(
                    "fuzzer still running after {}, killing it",
                    format::seconds(self.config.deadline())
                );
                terminate(&mut child)?;
                Ok(Outcome::TimedOut)
            }
        }
    }

    fn collect_metrics(&self, log_path: &Path, result: &mut RunResult) {
        let samples = match scrape::scrape_file(log_path) {
            Ok(samples) => samples,
            Err(err) => {
                warn!("{} Error parsing {}: {err}", Marker::Fail, log_path.display());
                vec![]
            }
        };
        let summary = MetricsSummary::from_samples(&samples);

        if let (Some(limit), Some(peak)) = (self.config.memory_limit_mb, summary.peak_memory_mb) {
            result.oom = peak >= limit;
        }
        if self.config.keep_timeline {
            result.summary = Some(summary);
            result.metrics_timeline = samples;
        }
    }
}

/// Kills `child` and reaps it. A failed kill is only an error if the child is still alive.
pub fn terminate(child: &mut Child) -> Result<(), RunError> {
    match child.kill() {
        Ok(()) => child.wait().map(drop).map_err(RunError::Wait),
        Err(err) => match child.try_wait() {
            Ok(Some(_)) => Ok(()),
            _ => Err(RunError::Kill(err)),
        },
    }
}

/// Polls `child` until it exits or `deadline` passes. `None` means the child is still running.
pub fn wait_until(child: &mut Child, deadline: Instant) -> io::Result<Option<ExitStatus>> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        let now = Instant::now();
        if now >= deadline {
            return Ok(None);
        }
        sleep(POLL_INTERVAL.min(deadline - now));
    }
}

fn config_names() -> Vec<&'static str> {
    RUN_CONFIGS.iter().map(|config| config.name).collect()
}

fn display_or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_owned(), |value| value.to_string())
}
