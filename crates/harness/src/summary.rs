// Copyright 2025-2026, Offchain Labs, Inc.
// For license information, see https://github.com/OffchainLabs/nitro/blob/master/LICENSE.md

use crate::scrape::MetricSample;
use serde::{Deserialize, Serialize};

/// Per-run reduction of a scraped timeline. Fields are `None` when the log never reported them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub samples: usize,
    pub max_state_corpus: Option<u64>,
    pub final_memory_mb: Option<f64>,
    pub avg_memory_mb: Option<f64>,
    pub peak_memory_mb: Option<f64>,
    pub state_growth_rate: Option<f64>,
}

impl MetricsSummary {
    pub fn from_samples(samples: &[MetricSample]) -> Self {
        let corpus: Vec<u64> = samples.iter().filter_map(|s| s.corpus_size).collect();
        let memory: Vec<f64> = samples.iter().filter_map(|s| s.memory_mb).collect();

        Self {
            samples: samples.len(),
            max_state_corpus: corpus.iter().copied().max(),
            final_memory_mb: memory.last().copied(),
            avg_memory_mb: mean(&memory),
            peak_memory_mb: memory.iter().copied().reduce(f64::max),
            state_growth_rate: growth_rate(&corpus),
        }
    }
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// `(last - first) / count`. Not normalized by elapsed time.
pub fn growth_rate(corpus: &[u64]) -> Option<f64> {
    let (first, last) = (corpus.first()?, corpus.last()?);
    Some((*last as f64 - *first as f64) / corpus.len() as f64)
}
