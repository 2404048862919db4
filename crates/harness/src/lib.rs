// Copyright 2025-2026, Offchain Labs, Inc.
// For license information, see https://github.com/OffchainLabs/nitro/blob/master/LICENSE.md

//! Benchmark harness for the `ityfuzz` smart-contract fuzzer.
//!
//! The harness writes the benchmark contracts, runs the fuzzer once per (contract, config)
//! pair under a wall-clock deadline, scrapes progress metrics out of each run's log and
//! reports the outcome as CSV, JSON and a console table. The state-overhead results can
//! then be charted with the `visualize` binary.

pub mod catalog;
pub mod cli;
pub mod fixtures;
pub mod layout;
pub mod logging;
pub mod report;
pub mod result;
pub mod runner;
pub mod scrape;
pub mod summary;
pub mod visualize;
