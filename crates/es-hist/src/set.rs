//! Named histogram collection acting as the pipeline's histogram sink.

use std::collections::{BTreeMap, BTreeSet};

use es_core::{Binning, HistogramSink};
use serde::{Deserialize, Serialize};

use crate::histogram::Histogram1D;

/// Histograms keyed by their full name (`"<variation>/<observable>"`).
///
/// The first fill of a name books the histogram with the binning it was given;
/// later fills with a different binning go into the booked histogram and are
/// reported once per name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistogramSet {
    histograms: BTreeMap<String, Histogram1D>,
    #[serde(skip)]
    conflicts: BTreeSet<String>,
}

impl HistogramSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Histogram by full name.
    pub fn get(&self, name: &str) -> Option<&Histogram1D> {
        self.histograms.get(name)
    }

    /// Number of booked histograms.
    pub fn len(&self) -> usize {
        self.histograms.len()
    }

    /// `true` if nothing has been booked.
    pub fn is_empty(&self) -> bool {
        self.histograms.is_empty()
    }

    /// Booked names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.histograms.keys().map(String::as_str)
    }

    /// `(name, histogram)` pairs, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Histogram1D)> {
        self.histograms.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Add every histogram of `other` into `self`.
    ///
    /// Names only present in `other` are adopted as-is. A name booked with
    /// different binnings on the two sides keeps `self`'s histogram.
    pub fn merge(&mut self, other: HistogramSet) {
        self.conflicts.extend(other.conflicts);
        for (name, hist) in other.histograms {
            match self.histograms.get_mut(&name) {
                Some(existing) => {
                    if let Err(e) = existing.merge(&hist) {
                        tracing::warn!("dropping '{name}' from merge: {e}");
                        self.conflicts.insert(name);
                    }
                }
                None => {
                    self.histograms.insert(name, hist);
                }
            }
        }
    }
}

impl HistogramSink for HistogramSet {
    fn fill(&mut self, name: &str, value: f64, weight: f64, binning: Binning) {
        if let Some(h) = self.histograms.get_mut(name) {
            if h.binning() != binning && self.conflicts.insert(name.to_string()) {
                tracing::warn!(
                    "histogram '{name}' re-filled with binning {binning:?}, keeping {:?}",
                    h.binning()
                );
            }
            h.fill(value, weight);
            return;
        }
        match Histogram1D::new(binning) {
            Ok(mut h) => {
                h.fill(value, weight);
                self.histograms.insert(name.to_string(), h);
            }
            Err(e) => {
                if self.conflicts.insert(name.to_string()) {
                    tracing::warn!("not booking histogram '{name}': {e}");
                }
            }
        }
    }
}
