// Copyright 2025-2026, Offchain Labs, Inc.
// For license information, see https://github.com/OffchainLabs/nitro/blob/master/LICENSE.md

//! Sample vulnerable contracts the fuzzer is pointed at.

use crate::catalog::CONTRACTS;
use benchutil::Marker;
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use tracing::info;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Archetype {
    Reentrancy,
    UnboundedLoop,
    PriceManipulation,
    AccessControl,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FixtureSet {
    /// Minimal contracts, one vulnerable function each.
    Sample,
    /// Larger contracts with surrounding functionality the fuzzer has to explore.
    Realistic,
}

impl FixtureSet {
    pub fn archetype(self, contract: &str) -> Option<Archetype> {
        use Archetype::*;

        let archetype = match (self, contract) {
            (_, "dvd_unstoppable") => UnboundedLoop,
            (_, "bacon_protocol") => Reentrancy,
            (_, "egd_finance") => PriceManipulation,
            (FixtureSet::Sample, "n00d_token") => UnboundedLoop,
            (FixtureSet::Sample, "contract1_undisclosed") => Reentrancy,
            (FixtureSet::Sample, "contract2_undisclosed") => UnboundedLoop,
            (FixtureSet::Realistic, "n00d_token") => AccessControl,
            (FixtureSet::Realistic, "contract1_undisclosed") => AccessControl,
            (FixtureSet::Realistic, "contract2_undisclosed") => Reentrancy,
            _ => return None,
        };
        Some(archetype)
    }

    pub fn source(self, contract: &str) -> Option<&'static str> {
        let source = match (self, self.archetype(contract)?) {
            (FixtureSet::Sample, Archetype::Reentrancy) => {
                include_str!("../templates/sample/reentrancy.sol")
            }
            (FixtureSet::Sample, Archetype::UnboundedLoop) => {
                include_str!("../templates/sample/dos.sol")
            }
            (FixtureSet::Sample, Archetype::PriceManipulation) => {
                include_str!("../templates/sample/price_manipulation.sol")
            }
            (FixtureSet::Sample, Archetype::AccessControl) => return None,
            (FixtureSet::Realistic, Archetype::Reentrancy) => {
                include_str!("../templates/realistic/reentrancy.sol")
            }
            (FixtureSet::Realistic, Archetype::UnboundedLoop) => {
                include_str!("../templates/realistic/dos.sol")
            }
            (FixtureSet::Realistic, Archetype::PriceManipulation) => {
                include_str!("../templates/realistic/price_manipulation.sol")
            }
            (FixtureSet::Realistic, Archetype::AccessControl) => {
                include_str!("../templates/realistic/access_control.sol")
            }
        };
        Some(source)
    }
}

/// Writes `<name>.sol` into `dir` for every catalog contract that doesn't have one yet.
/// Existing files are never touched, so hand edits survive regeneration.
/// Returns the paths that were created.
pub fn generate(dir: &Path, set: FixtureSet) -> io::Result<Vec<PathBuf>> {
    info!("{} Creating sample smart contracts...", Marker::Step);
    fs::create_dir_all(dir)?;

    let mut created = vec![];
    for contract in CONTRACTS {
        let Some(source) = set.source(contract) else {
            continue;
        };
        let path = dir.join(format!("{contract}.sol"));
        if path.exists() {
            continue;
        }
        fs::write(&path, source)?;
        info!("{} Created {contract}.sol", Marker::Done);
        created.push(path);
    }
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_contract_has_a_fixture() {
        for set in [FixtureSet::Sample, FixtureSet::Realistic] {
            for contract in CONTRACTS {
                let source = set.source(contract).unwrap();
                assert!(source.starts_with("pragma solidity"), "{contract}");
            }
        }
        assert_eq!(FixtureSet::Sample.source("unknown"), None);
        assert_eq!(
            FixtureSet::Realistic.archetype("n00d_token"),
            Some(Archetype::AccessControl)
        );
    }

    #[test]
    fn generate_creates_nested_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("a").join("contracts");

        let created = generate(&dir, FixtureSet::Realistic).unwrap();
        assert_eq!(created.len(), CONTRACTS.len());
        for contract in CONTRACTS {
            let text = fs::read_to_string(dir.join(format!("{contract}.sol"))).unwrap();
            assert_eq!(text, FixtureSet::Realistic.source(contract).unwrap());
        }
    }

    #[test]
    fn generate_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();

        let edited = dir.join("bacon_protocol.sol");
        fs::write(&edited, "// hand edited\n").unwrap();

        let created = generate(dir, FixtureSet::Sample).unwrap();
        assert_eq!(created.len(), CONTRACTS.len() - 1);
        assert!(!created.contains(&edited));

        let before: Vec<_> = CONTRACTS
            .iter()
            .map(|c| fs::read(dir.join(format!("{c}.sol"))).unwrap())
            .collect();

        // a different set must not overwrite either
        assert!(generate(dir, FixtureSet::Realistic).unwrap().is_empty());

        let after: Vec<_> = CONTRACTS
            .iter()
            .map(|c| fs::read(dir.join(format!("{c}.sol"))).unwrap())
            .collect();
        assert_eq!(before, after);
        assert_eq!(fs::read_to_string(&edited).unwrap(), "// hand edited\n");
    }
}
