// Copyright 2025-2026, Offchain Labs, Inc.
// For license information, see https://github.com/OffchainLabs/nitro/blob/master/LICENSE.md

use clap::Parser;
use eyre::Result;
use harness::{
    catalog::Study,
    cli::{self, HarnessArgs, HarnessCommand},
};

/// State-overhead study: corpus growth and memory use of each fuzzer configuration.
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
    cli::run(Study::StateOverhead, &cli.args, cli.command.as_ref())
}
