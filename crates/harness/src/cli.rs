// Copyright 2025-2026, Offchain Labs, Inc.
// For license information, see https://github.com/OffchainLabs/nitro/blob/master/LICENSE.md

//! Command line surface shared by the harness binaries.

use crate::{
    catalog::Study,
    fixtures,
    layout::Layout,
    logging::{self, LoggingFormat},
    report,
    runner::{Runner, RunnerConfig, DEFAULT_FUZZER},
    visualize,
};
use benchutil::Marker;
use clap::{Args, Subcommand};
use eyre::Result;
use std::{path::PathBuf, time::Duration};
use tracing::info;

#[derive(Clone, Debug, Args)]
pub struct HarnessArgs {
    /// Fuzzer executable, looked up on `PATH` when not a path.
    #[clap(long, default_value = DEFAULT_FUZZER)]
    pub fuzzer: PathBuf,

    /// Directory holding `contracts/` and the results tree.
    #[clap(long, default_value = ".")]
    pub work_dir: PathBuf,

    /// Seconds passed to the fuzzer as `--timeout`. Defaults to the study's budget.
    #[clap(long)]
    pub timeout: Option<u64>,

    /// Extra seconds the fuzzer gets to exit before it is killed.
    #[clap(long, default_value_t = 10)]
    pub grace: u64,

    /// Flag a run as out of memory when its scraped memory reaches this many MB.
    #[clap(long)]
    pub memory_limit_mb: Option<f64>,

    /// Logging format configuration.
    #[clap(long, value_enum, default_value_t = LoggingFormat::Text)]
    pub logging_format: LoggingFormat,
}

impl HarnessArgs {
    pub fn runner_config(&self, study: Study) -> RunnerConfig {
        let mut config = RunnerConfig::for_study(study, &self.fuzzer);
        if let Some(secs) = self.timeout {
            config.timeout = Duration::from_secs(secs);
        }
        config.grace = Duration::from_secs(self.grace);
        config.memory_limit_mb = self.memory_limit_mb;
        config
    }

    pub fn runner(&self, study: Study) -> Runner {
        let layout = Layout::new(&self.work_dir, study);
        Runner::new(layout, self.runner_config(study))
    }
}

#[derive(Clone, Debug, Subcommand)]
pub enum HarnessCommand {
    /// Run one contract with one configuration and print the result.
    Single {
        contract: String,
        /// Defaults to the baseline configuration.
        config: Option<String>,
    },
    /// Write any missing contract fixtures and exit.
    Fixtures,
}

/// Entry point of the study binaries. Without a subcommand the full matrix is swept.
pub fn run(study: Study, args: &HarnessArgs, command: Option<&HarnessCommand>) -> Result<()> {
    logging::init(args.logging_format)?;
    let runner = args.runner(study);

    match command {
        None => {
            let results = runner.sweep()?;
            report::save(runner.layout(), &results)?;
        }
        Some(HarnessCommand::Single { contract, config }) => {
            let result = runner.single(contract, config.as_deref())?;
            println!("\n{}", Marker::Done.line("Result:"));
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Some(HarnessCommand::Fixtures) => {
            let layout = runner.layout();
            let created = fixtures::generate(&layout.contracts_dir, study.fixture_set())?;
            info!(
                "{} {} fixture(s) created in {}",
                Marker::Done,
                created.len(),
                layout.contracts_dir.display()
            );
        }
    }
    Ok(())
}

#[derive(Clone, Debug, Args)]
pub struct VisualizeArgs {
    /// Directory holding the state-overhead results tree.
    #[clap(long, default_value = ".")]
    pub work_dir: PathBuf,

    /// Metrics file to read. Defaults to the state-overhead JSON under `--work-dir`.
    #[clap(long)]
    pub metrics: Option<PathBuf>,

    /// Output directory for the charts. Defaults to the state-overhead plots directory.
    #[clap(long)]
    pub plots_dir: Option<PathBuf>,

    /// Logging format configuration.
    #[clap(long, value_enum, default_value_t = LoggingFormat::Text)]
    pub logging_format: LoggingFormat,
}

impl VisualizeArgs {
    /// Metrics file and plots directory, with defaults filled in.
    pub fn paths(&self) -> (PathBuf, PathBuf) {
        let layout = Layout::new(&self.work_dir, Study::StateOverhead);
        let metrics = self.metrics.clone().unwrap_or_else(|| layout.json_path());
        let plots = self.plots_dir.clone().unwrap_or(layout.plots_dir);
        (metrics, plots)
    }
}

pub fn visualize(args: &VisualizeArgs) -> Result<()> {
    logging::init(args.logging_format)?;
    let (metrics, plots) = args.paths();

    println!("\n{}", "=".repeat(70));
    println!("RQ3 Visualization");
    println!("{}\n", "=".repeat(70));

    let written = visualize::generate_all(&metrics, &plots)?;
    if !written.is_empty() {
        info!("{} All plots saved to: {}", Marker::Done, plots.display());
    }
    Ok(())
}
