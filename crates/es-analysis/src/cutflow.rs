//! Cut-flow bookkeeping.

use std::collections::BTreeMap;

use es_core::Binning;
use serde::{Deserialize, Serialize};

/// Name of the per-variation cut-flow histogram.
pub const CUTFLOW_HISTOGRAM: &str = "CutFlow";

/// Binning of the cut-flow histogram: one unit-width bin per stage.
pub const CUTFLOW_BINNING: Binning = Binning::uniform(10, 0.0, 10.0);

/// Unweighted event counts per variation and selection stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CutFlow {
    stages: Vec<String>,
    counts: BTreeMap<String, Vec<u64>>,
}

impl CutFlow {
    /// Empty cut flow with the given stage labels.
    pub fn new(stages: &[&str]) -> Self {
        Self { stages: stages.iter().map(|s| s.to_string()).collect(), counts: BTreeMap::new() }
    }

    /// Stage labels in order.
    pub fn stages(&self) -> &[String] {
        &self.stages
    }

    /// Count one event reaching `stage` under `variation`.
    pub fn record(&mut self, variation: &str, stage: usize) {
        let n = self.stages.len().max(stage + 1);
        let row = self.counts.entry(variation.to_string()).or_insert_with(|| vec![0; n]);
        if row.len() <= stage {
            row.resize(stage + 1, 0);
        }
        row[stage] += 1;
    }

    /// Events that reached `stage` under `variation`.
    pub fn count(&self, variation: &str, stage: usize) -> u64 {
        self.counts.get(variation).and_then(|row| row.get(stage)).copied().unwrap_or(0)
    }

    /// Variations with at least one recorded event.
    pub fn variations(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    /// Add the counts of `other`.
    pub fn merge(&mut self, other: &CutFlow) {
        if self.stages.is_empty() {
            self.stages = other.stages.clone();
        }
        for (variation, row) in &other.counts {
            let mine = self.counts.entry(variation.clone()).or_default();
            if mine.len() < row.len() {
                mine.resize(row.len(), 0);
            }
            for (a, b) in mine.iter_mut().zip(row) {
                *a += b;
            }
        }
    }
}
