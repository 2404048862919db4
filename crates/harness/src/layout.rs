// Copyright 2025-2026, Offchain Labs, Inc.
// For license information, see https://github.com/OffchainLabs/nitro/blob/master/LICENSE.md

use crate::catalog::Study;
use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Where a study reads fixtures from and writes its artifacts to.
#[derive(Clone, Debug)]
pub struct Layout {
    pub study: Study,
    pub contracts_dir: PathBuf,
    pub results_dir: PathBuf,
    pub logs_dir: PathBuf,
    pub data_dir: PathBuf,
    pub plots_dir: PathBuf,
}

impl Layout {
    pub fn new(work_dir: &Path, study: Study) -> Self {
        let results_dir = work_dir.join(study.results_dir());
        Self {
            study,
            contracts_dir: work_dir.join("contracts"),
            logs_dir: results_dir.join("logs"),
            data_dir: results_dir.join("data"),
            plots_dir: results_dir.join("plots"),
            results_dir,
        }
    }

    /// Creates the log and data directories. Plots are created on demand by the visualizer.
    pub fn create(&self) -> io::Result<()> {
        fs::create_dir_all(&self.logs_dir)?;
        fs::create_dir_all(&self.data_dir)
    }

    pub fn contract_path(&self, contract: &str) -> PathBuf {
        self.contracts_dir.join(format!("{contract}.sol"))
    }

    /// One log per (contract, config) pair, so no two runs share a file.
    pub fn log_path(&self, contract: &str, config: &str) -> PathBuf {
        let config = config.replace('-', "_");
        self.logs_dir.join(format!("{contract}_{config}.log"))
    }

    pub fn csv_path(&self) -> PathBuf {
        self.data_dir.join(self.study.csv_name())
    }

    pub fn json_path(&self) -> PathBuf {
        self.data_dir.join(self.study.json_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths() {
        let layout = Layout::new(Path::new("/w"), Study::StateOverhead);
        assert_eq!(layout.contract_path("n00d_token"), Path::new("/w/contracts/n00d_token.sol"));
        assert_eq!(
            layout.log_path("n00d_token", "ItyFuzz-DF"),
            Path::new("/w/results_rq3/logs/n00d_token_ItyFuzz_DF.log")
        );
        assert_eq!(layout.json_path(), Path::new("/w/results_rq3/data/rq3_metrics.json"));
        assert_eq!(layout.plots_dir, Path::new("/w/results_rq3/plots"));

        let layout = Layout::new(Path::new("w"), Study::Ablation);
        assert_eq!(layout.csv_path(), Path::new("w/results/data/results.csv"));
    }
}
