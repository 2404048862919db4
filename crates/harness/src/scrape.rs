// Copyright 2025-2026, Offchain Labs, Inc.
// For license information, see https://github.com/OffchainLabs/nitro/blob/master/LICENSE.md

//! Recovers coarse metrics from the fuzzer's human-readable log.
//!
//! Every line is checked against a small table of independent patterns. The patterns are
//! heuristics: they match the first number following a keyword, so unrelated numbers on a
//! line that mentions "state" or "memory" are picked up as well. A field that no pattern
//! matched stays `None`, which keeps "not reported" apart from a reported zero.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{fs, io, path::Path};

/// Spacing of timestamps made up for lines that carry none.
pub const SYNTHETIC_STEP_SECS: f64 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    StateSize,
    CorpusSize,
    MemoryMb,
}

lazy_static! {
    static ref EXTRACTORS: [(Field, Regex); 3] = [
        (Field::StateSize, Regex::new(r"[Ss]tate.*?(\d+)").unwrap()),
        (Field::CorpusSize, Regex::new(r"[Cc]orpus.*?(\d+)").unwrap()),
        (
            Field::MemoryMb,
            Regex::new(r"[Mm]emory.*?(\d+(?:\.\d+)?)\s*(?:MB|M)").unwrap()
        ),
    ];
    static ref TIMESTAMP: Regex = Regex::new(r"\[(\d+\.\d+)s\]").unwrap();
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    /// Seconds, from the line's `[12.5s]` prefix when present.
    pub timestamp: f64,
    pub state_size: Option<u64>,
    pub corpus_size: Option<u64>,
    pub memory_mb: Option<f64>,
}

impl MetricSample {
    fn is_empty(&self) -> bool {
        self.state_size.is_none() && self.corpus_size.is_none() && self.memory_mb.is_none()
    }
}

/// Extracts a sample from `line`, or `None` when no metric pattern matches.
/// `index` is the number of samples emitted before this line.
pub fn scrape_line(line: &str, index: usize) -> Option<MetricSample> {
    let mut sample = MetricSample::default();
    for (field, pattern) in EXTRACTORS.iter() {
        let Some(value) = pattern.captures(line).and_then(|caps| caps.get(1)) else {
            continue;
        };
        let value = value.as_str();
        match field {
            Field::StateSize => sample.state_size = value.parse().ok(),
            Field::CorpusSize => sample.corpus_size = value.parse().ok(),
            Field::MemoryMb => sample.memory_mb = value.parse().ok(),
        }
    }
    if sample.is_empty() {
        return None;
    }

    sample.timestamp = TIMESTAMP
        .captures(line)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(index as f64 * SYNTHETIC_STEP_SECS);
    Some(sample)
}

/// Samples in line order. A pure function of `text`.
pub fn scrape_str(text: &str) -> Vec<MetricSample> {
    let mut samples = vec![];
    for line in text.lines() {
        if let Some(sample) = scrape_line(line, samples.len()) {
            samples.push(sample);
        }
    }
    samples
}

/// Scrapes a captured log. Bytes that aren't UTF-8 are replaced rather than rejected,
/// since the fuzzer may be killed mid-write.
pub fn scrape_file(path: &Path) -> io::Result<Vec<MetricSample>> {
    let bytes = fs::read(path)?;
    Ok(scrape_str(&String::from_utf8_lossy(&bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_fields() {
        let sample = scrape_line("[3.25s] State corpus size: 1234", 0).unwrap();
        assert_eq!(sample.timestamp, 3.25);
        assert_eq!(sample.state_size, Some(1234));
        assert_eq!(sample.corpus_size, Some(1234));
        assert_eq!(sample.memory_mb, None);

        let sample = scrape_line("Memory usage: 512.5 MB", 4).unwrap();
        assert_eq!(sample.memory_mb, Some(512.5));
        assert_eq!(sample.corpus_size, None);
        assert_eq!(sample.timestamp, 2.0);

        let sample = scrape_line("memory 80M", 0).unwrap();
        assert_eq!(sample.memory_mb, Some(80.));

        assert_eq!(scrape_line("executions: 100000 exec/s: 4000", 0), None);
        assert_eq!(scrape_line("Memory pressure is high", 0), None);
    }

    #[test]
    fn zero_is_not_absent() {
        let sample = scrape_line("corpus: 0", 0).unwrap();
        assert_eq!(sample.corpus_size, Some(0));
        assert_eq!(sample.state_size, None);
    }

    #[test]
    fn overflowing_numbers_are_misses() {
        assert_eq!(scrape_line("corpus 99999999999999999999999", 0), None);
    }

    #[test]
    fn synthetic_timestamps_count_samples_not_lines() {
        let log = "\
starting fuzzer
corpus: 1
noise
[10.0s] corpus: 5 memory: 20 MB
corpus: 9
";
        let samples = scrape_str(log);
        let times: Vec<_> = samples.iter().map(|s| s.timestamp).collect();
        assert_eq!(times, vec![0.0, 10.0, 1.0]);
        let corpus: Vec<_> = samples.iter().map(|s| s.corpus_size).collect();
        assert_eq!(corpus, vec![Some(1), Some(5), Some(9)]);
        assert_eq!(samples[1].memory_mb, Some(20.));
    }

    #[test]
    fn scraping_is_deterministic() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("run.log");
        fs::write(&path, "[0.5s] corpus 3\n[1.5s] Memory 70 MB\ncorpus 4 state 2\n").unwrap();

        let first = scrape_file(&path).unwrap();
        let second = scrape_file(&path).unwrap();
        assert_eq!(first.len(), 3);
        assert_eq!(first, second);
    }

    #[test]
    fn invalid_utf8_is_tolerated() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("run.log");
        fs::write(&path, b"corpus 7 \xff\xfe\n").unwrap();
        assert_eq!(scrape_file(&path).unwrap()[0].corpus_size, Some(7));
        assert!(scrape_file(&tmp.path().join("missing.log")).is_err());
    }
}
