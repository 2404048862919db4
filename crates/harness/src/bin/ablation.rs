// Copyright 2025-2026, Offchain Labs, Inc.
// For license information, see https://github.com/OffchainLabs/nitro/blob/master/LICENSE.md

use clap::Parser;
use eyre::Result;
use harness::{
    catalog::Study,
    cli::{self, HarnessArgs, HarnessCommand},
};

/// Ablation study: detection time of each fuzzer configuration.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    #[clap(flatten)]
    args: HarnessArgs,

    #[clap(subcommand)]
    command: Option<HarnessCommand>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli::run(Study::Ablation, &cli.args, cli.command.as_ref())
}
