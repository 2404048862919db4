// Copyright 2025-2026, Offchain Labs, Inc.
// For license information, see https://github.com/OffchainLabs/nitro/blob/master/LICENSE.md

//! Fixed tables the harness sweeps over: the benchmark contracts, the fuzzer
//! configurations under comparison and the two studies that drive them.

use crate::fixtures::FixtureSet;
use std::time::Duration;
use strum_macros::{Display, EnumIter, EnumString};

/// Benchmark contracts, in sweep order.
pub const CONTRACTS: [&str; 6] = [
    "dvd_unstoppable",
    "bacon_protocol",
    "n00d_token",
    "egd_finance",
    "contract1_undisclosed",
    "contract2_undisclosed",
];

/// Chart colour used for configurations outside the catalog.
pub const UNKNOWN_CONFIG_COLOR: (u8, u8, u8) = (0, 0, 0);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunConfig {
    pub name: &'static str,
    /// Flags appended to the fuzzer invocation.
    pub args: &'static [&'static str],
    pub color: (u8, u8, u8),
}

pub const RUN_CONFIGS: [RunConfig; 3] = [
    RunConfig {
        name: "ItyFuzz",
        args: &[],
        color: (0xFF, 0x8C, 0x42),
    },
    RunConfig {
        name: "ItyFuzz-DF",
        args: &["--dataflow"],
        color: (0x1F, 0x77, 0xB4),
    },
    RunConfig {
        name: "ItyFuzz-Rand",
        args: &["--random"],
        color: (0xFF, 0xD7, 0x00),
    },
];

pub const DEFAULT_CONFIG: &str = "ItyFuzz";

pub fn find_contract(name: &str) -> Option<&'static str> {
    CONTRACTS.iter().copied().find(|contract| *contract == name)
}

pub fn find_config(name: &str) -> Option<&'static RunConfig> {
    RUN_CONFIGS.iter().find(|config| config.name == name)
}

pub fn config_color(name: &str) -> (u8, u8, u8) {
    find_config(name).map_or(UNKNOWN_CONFIG_COLOR, |config| config.color)
}

/// The two experiments the harness knows how to run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, EnumString, EnumIter)]
pub enum Study {
    /// Detection time of each configuration, one short run per pair.
    #[strum(serialize = "ablation")]
    Ablation,
    /// Corpus growth and memory use sampled from verbose fuzzer logs.
    #[strum(serialize = "state-overhead")]
    StateOverhead,
}

impl Study {
    pub fn title(self) -> &'static str {
        match self {
            Study::Ablation => "ItyFuzz EVM Ablation Study",
            Study::StateOverhead => "RQ3: State Overhead Analysis - ItyFuzz EVM",
        }
    }

    pub fn results_dir(self) -> &'static str {
        match self {
            Study::Ablation => "results",
            Study::StateOverhead => "results_rq3",
        }
    }

    pub fn default_timeout(self) -> Duration {
        match self {
            Study::Ablation => Duration::from_secs(60),
            Study::StateOverhead => Duration::from_secs(120),
        }
    }

    /// Whether the fuzzer is asked for the verbose output the metrics come from.
    pub fn verbose(self) -> bool {
        matches!(self, Study::StateOverhead)
    }

    /// Whether results carry the scraped timeline and its summary.
    pub fn keeps_timeline(self) -> bool {
        matches!(self, Study::StateOverhead)
    }

    pub fn csv_name(self) -> &'static str {
        match self {
            Study::Ablation => "results.csv",
            Study::StateOverhead => "rq3_summary.csv",
        }
    }

    pub fn json_name(self) -> &'static str {
        match self {
            Study::Ablation => "results.json",
            Study::StateOverhead => "rq3_metrics.json",
        }
    }

    pub fn fixture_set(self) -> FixtureSet {
        match self {
            Study::Ablation => FixtureSet::Sample,
            Study::StateOverhead => FixtureSet::Realistic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{collections::HashSet, str::FromStr};
    use strum::IntoEnumIterator;

    #[test]
    fn lookups() {
        assert_eq!(find_contract("egd_finance"), Some("egd_finance"));
        assert_eq!(find_contract("egd"), None);
        assert_eq!(find_config("ItyFuzz-DF").unwrap().args, &["--dataflow"]);
        assert!(find_config("itYfuzz").is_none());
        assert_eq!(config_color("ItyFuzz-Rand"), (0xFF, 0xD7, 0x00));
        assert_eq!(config_color("AFL"), UNKNOWN_CONFIG_COLOR);
        assert!(find_config(DEFAULT_CONFIG).is_some());
    }

    #[test]
    fn study_names() {
        assert_eq!(Study::from_str("state-overhead").unwrap(), Study::StateOverhead);
        assert_eq!(Study::Ablation.to_string(), "ablation");
        assert_eq!(Study::Ablation.default_timeout(), Duration::from_secs(60));
        assert_eq!(Study::StateOverhead.default_timeout(), Duration::from_secs(120));
    }

    #[test]
    fn studies_write_to_separate_trees() {
        let dirs: HashSet<_> = Study::iter().map(Study::results_dir).collect();
        let files: HashSet<_> = Study::iter().map(Study::json_name).collect();
        assert_eq!(dirs.len(), 2);
        assert_eq!(files.len(), 2);
    }
}
