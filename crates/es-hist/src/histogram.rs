//! Uniform-binned weighted 1D histogram.

use es_core::{Binning, Error, Result};
use serde::{Deserialize, Serialize};

/// A 1D histogram with uniform binning, per-bin sum of weights squared, and
/// explicit underflow/overflow accumulators.
///
/// Values equal to `high` go to overflow (bins are `[low, high)`). `NaN`
/// values are not binned; they are counted in [`Histogram1D::nan_entries`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "HistogramRecord", try_from = "HistogramRecord")]
pub struct Histogram1D {
    binning: Binning,
    bin_content: Vec<f64>,
    sumw2: Vec<f64>,
    underflow: f64,
    overflow: f64,
    underflow_sumw2: f64,
    overflow_sumw2: f64,
    entries: u64,
    nan_entries: u64,
}

impl Histogram1D {
    /// Empty histogram; fails on an invalid binning.
    pub fn new(binning: Binning) -> Result<Self> {
        binning.validate()?;
        Ok(Self {
            binning,
            bin_content: vec![0.0; binning.n_bins],
            sumw2: vec![0.0; binning.n_bins],
            underflow: 0.0,
            overflow: 0.0,
            underflow_sumw2: 0.0,
            overflow_sumw2: 0.0,
            entries: 0,
            nan_entries: 0,
        })
    }

    /// Binning.
    pub fn binning(&self) -> Binning {
        self.binning
    }

    /// Bin index of `value`, `None` for under/overflow and `NaN`.
    pub fn find_bin(&self, value: f64) -> Option<usize> {
        let b = &self.binning;
        if value.is_nan() || value < b.low || value >= b.high {
            return None;
        }
        let idx = ((value - b.low) / b.width()).floor() as usize;
        // rounding near `high` can land one past the end
        Some(idx.min(b.n_bins - 1))
    }

    /// Add `weight` at `value`.
    pub fn fill(&mut self, value: f64, weight: f64) {
        let w2 = weight * weight;
        if value.is_nan() {
            self.nan_entries += 1;
            return;
        }
        self.entries += 1;
        match self.find_bin(value) {
            Some(bin) => {
                self.bin_content[bin] += weight;
                self.sumw2[bin] += w2;
            }
            None if value < self.binning.low => {
                self.underflow += weight;
                self.underflow_sumw2 += w2;
            }
            None => {
                self.overflow += weight;
                self.overflow_sumw2 += w2;
            }
        }
    }

    /// Add another histogram with identical binning.
    pub fn merge(&mut self, other: &Histogram1D) -> Result<()> {
        if self.binning != other.binning {
            return Err(Error::Validation(format!(
                "cannot merge histograms with different binning: {:?} vs {:?}",
                self.binning, other.binning
            )));
        }
        for (a, b) in self.bin_content.iter_mut().zip(&other.bin_content) {
            *a += b;
        }
        for (a, b) in self.sumw2.iter_mut().zip(&other.sumw2) {
            *a += b;
        }
        self.underflow += other.underflow;
        self.overflow += other.overflow;
        self.underflow_sumw2 += other.underflow_sumw2;
        self.overflow_sumw2 += other.overflow_sumw2;
        self.entries += other.entries;
        self.nan_entries += other.nan_entries;
        Ok(())
    }

    /// Sum of weights per bin (excluding under/overflow).
    pub fn bin_content(&self) -> &[f64] {
        &self.bin_content
    }

    /// Sum of squared weights per bin.
    pub fn sumw2(&self) -> &[f64] {
        &self.sumw2
    }

    /// Content of bin `i`, or `None` if out of range.
    pub fn content(&self, i: usize) -> Option<f64> {
        self.bin_content.get(i).copied()
    }

    /// Underflow sum of weights.
    pub fn underflow(&self) -> f64 {
        self.underflow
    }

    /// Overflow sum of weights.
    pub fn overflow(&self) -> f64 {
        self.overflow
    }

    /// Number of fills with a non-`NaN` value, including under/overflow.
    pub fn entries(&self) -> u64 {
        self.entries
    }

    /// Number of fills with a `NaN` value.
    pub fn nan_entries(&self) -> u64 {
        self.nan_entries
    }

    /// Sum of in-range bin contents.
    pub fn integral(&self) -> f64 {
        self.bin_content.iter().sum()
    }
}

/// Serialised form of [`Histogram1D`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct HistogramRecord {
    #[serde(flatten)]
    binning: Binning,
    #[serde(default, skip_deserializing)]
    bin_edges: Vec<f64>,
    bin_content: Vec<f64>,
    sumw2: Vec<f64>,
    #[serde(default)]
    underflow: f64,
    #[serde(default)]
    overflow: f64,
    #[serde(default)]
    underflow_sumw2: f64,
    #[serde(default)]
    overflow_sumw2: f64,
    #[serde(default)]
    entries: u64,
    #[serde(default)]
    nan_entries: u64,
}

impl From<Histogram1D> for HistogramRecord {
    fn from(h: Histogram1D) -> Self {
        HistogramRecord {
            bin_edges: h.binning.edges(),
            binning: h.binning,
            bin_content: h.bin_content,
            sumw2: h.sumw2,
            underflow: h.underflow,
            overflow: h.overflow,
            underflow_sumw2: h.underflow_sumw2,
            overflow_sumw2: h.overflow_sumw2,
            entries: h.entries,
            nan_entries: h.nan_entries,
        }
    }
}

impl TryFrom<HistogramRecord> for Histogram1D {
    type Error = Error;

    fn try_from(r: HistogramRecord) -> Result<Self> {
        r.binning.validate()?;
        let n = r.binning.n_bins;
        if r.bin_content.len() != n || r.sumw2.len() != n {
            return Err(Error::Validation(format!(
                "histogram arrays do not match binning: n_bins={n}, len(bin_content)={}, len(sumw2)={}",
                r.bin_content.len(),
                r.sumw2.len()
            )));
        }
        Ok(Histogram1D {
            binning: r.binning,
            bin_content: r.bin_content,
            sumw2: r.sumw2,
            underflow: r.underflow,
            overflow: r.overflow,
            underflow_sumw2: r.underflow_sumw2,
            overflow_sumw2: r.overflow_sumw2,
            entries: r.entries,
            nan_entries: r.nan_entries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn h(n: usize, lo: f64, hi: f64) -> Histogram1D {
        Histogram1D::new(Binning::uniform(n, lo, hi)).unwrap()
    }

    #[test]
    fn find_bin_edge_cases() {
        let h = h(3, 0.0, 3.0);
        assert_eq!(h.find_bin(-0.5), None);
        assert_eq!(h.find_bin(3.0), None);
        assert_eq!(h.find_bin(0.0), Some(0));
        assert_eq!(h.find_bin(1.0), Some(1));
        assert_eq!(h.find_bin(2.99), Some(2));
        assert_eq!(h.find_bin(f64::NAN), None);
    }

    #[test]
    fn fill_tracks_flows_and_sumw2() {
        let mut h = h(2, 0.0, 2.0);
        h.fill(0.5, 2.0);
        h.fill(1.5, -1.0);
        h.fill(-1.0, 3.0);
        h.fill(2.0, 0.5);
        h.fill(f64::INFINITY, 1.0);
        h.fill(f64::NAN, 1.0);

        assert_eq!(h.bin_content(), &[2.0, -1.0]);
        assert_eq!(h.sumw2(), &[4.0, 1.0]);
        assert_eq!(h.underflow(), 3.0);
        assert_eq!(h.overflow(), 1.5);
        assert_eq!(h.entries(), 5);
        assert_eq!(h.nan_entries(), 1);
        assert_relative_eq!(h.integral(), 1.0);
    }

    #[test]
    fn merge_adds_and_rejects_mismatch() {
        let mut a = h(2, 0.0, 2.0);
        let mut b = h(2, 0.0, 2.0);
        a.fill(0.5, 1.0);
        b.fill(0.5, 2.0);
        b.fill(5.0, 1.0);
        a.merge(&b).unwrap();
        assert_eq!(a.content(0), Some(3.0));
        assert_eq!(a.sumw2()[0], 5.0);
        assert_eq!(a.overflow(), 1.0);
        assert_eq!(a.entries(), 3);

        let c = h(4, 0.0, 2.0);
        assert!(a.merge(&c).is_err());
    }

    #[test]
    fn invalid_binning_rejected() {
        assert!(Histogram1D::new(Binning::uniform(0, 0.0, 1.0)).is_err());
        assert!(Histogram1D::new(Binning::uniform(3, 1.0, 1.0)).is_err());
    }

    #[test]
    fn json_carries_edges_and_round_trips() {
        let mut h = h(2, 0.0, 1.0);
        h.fill(0.25, 1.5);
        let v = serde_json::to_value(&h).unwrap();
        assert_eq!(v["bin_edges"], serde_json::json!([0.0, 0.5, 1.0]));
        assert_eq!(v["n_bins"], 2);
        let back: Histogram1D = serde_json::from_value(v).unwrap();
        assert_eq!(back, h);
    }

    #[test]
    fn json_with_wrong_lengths_rejected() {
        let bad = r#"{"n_bins": 3, "low": 0.0, "high": 1.0, "bin_content": [1.0], "sumw2": [1.0]}"#;
        assert!(serde_json::from_str::<Histogram1D>(bad).is_err());
    }
}
