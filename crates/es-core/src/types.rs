//! Common data types for evsel

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Name of the unperturbed baseline variation.
pub const NOMINAL_VARIATION: &str = "Central";

/// Data-taking period label.
///
/// Only used to validate the run card and to tag outputs; trigger paths and
/// calibration inputs for an era are supplied from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Era {
    /// 2016, before the VFP setting change.
    Run2016PreVfp,
    /// 2016, after the VFP setting change.
    Run2016PostVfp,
    /// 2017
    Run2017,
    /// 2018
    Run2018,
    /// 2022, eras C–D.
    Run2022,
    /// 2022, eras E–G.
    Run2022EE,
    /// 2023, era C.
    Run2023,
    /// 2023, era D (BPix issue).
    Run2023BPix,
}

impl Era {
    /// All known eras, oldest first.
    pub const ALL: [Era; 8] = [
        Era::Run2016PreVfp,
        Era::Run2016PostVfp,
        Era::Run2017,
        Era::Run2018,
        Era::Run2022,
        Era::Run2022EE,
        Era::Run2023,
        Era::Run2023BPix,
    ];

    /// Canonical label, as written in run cards.
    pub fn as_str(self) -> &'static str {
        match self {
            Era::Run2016PreVfp => "2016preVFP",
            Era::Run2016PostVfp => "2016postVFP",
            Era::Run2017 => "2017",
            Era::Run2018 => "2018",
            Era::Run2022 => "2022",
            Era::Run2022EE => "2022EE",
            Era::Run2023 => "2023",
            Era::Run2023BPix => "2023BPix",
        }
    }
}

impl fmt::Display for Era {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Era {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Era::ALL
            .into_iter()
            .find(|era| era.as_str() == s)
            .ok_or_else(|| Error::Config(format!("unrecognized era label: '{s}'")))
    }
}

impl TryFrom<String> for Era {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Era> for String {
    fn from(era: Era) -> Self {
        era.as_str().to_string()
    }
}

/// Uniform 1D binning: `n_bins` equal-width bins over `[low, high)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Binning {
    /// Number of bins (excluding under/overflow).
    pub n_bins: usize,
    /// Lower edge of the first bin.
    pub low: f64,
    /// Upper edge of the last bin.
    pub high: f64,
}

impl Binning {
    /// Binning without validation, for compile-time analysis constants.
    pub const fn uniform(n_bins: usize, low: f64, high: f64) -> Self {
        Self { n_bins, low, high }
    }

    /// Validated constructor.
    pub fn new(n_bins: usize, low: f64, high: f64) -> Result<Self> {
        let b = Self::uniform(n_bins, low, high);
        b.validate()?;
        Ok(b)
    }

    /// Check that the binning describes at least one finite, non-empty bin.
    pub fn validate(&self) -> Result<()> {
        if self.n_bins == 0 {
            return Err(Error::Validation("binning needs at least one bin".into()));
        }
        if !self.low.is_finite() || !self.high.is_finite() || self.low >= self.high {
            return Err(Error::Validation(format!(
                "invalid binning range: expected low < high, got ({}, {})",
                self.low, self.high
            )));
        }
        Ok(())
    }

    /// Width of a single bin.
    pub fn width(&self) -> f64 {
        (self.high - self.low) / self.n_bins as f64
    }

    /// Bin edges (length `n_bins + 1`).
    pub fn edges(&self) -> Vec<f64> {
        let w = self.width();
        (0..=self.n_bins)
            .map(|i| if i == self.n_bins { self.high } else { self.low + w * i as f64 })
            .collect()
    }
}

/// One systematic-variation hypothesis.
///
/// The scale factors are the numeric inputs the corrections collaborator
/// perturbs; the selection logic itself never looks at them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variation {
    /// Variation label, used as the histogram namespace.
    pub name: String,
    /// Multiplier applied to jet and fat-jet four-momenta.
    #[serde(default = "unit")]
    pub jet_energy_scale: f64,
    /// Multiplier applied to muon four-momenta.
    #[serde(default = "unit")]
    pub muon_momentum_scale: f64,
    /// Per-lepton scale factor folded into the event weight.
    #[serde(default = "unit")]
    pub lepton_sf: f64,
    /// Per-event multiplicative weight factor.
    #[serde(default = "unit")]
    pub event_weight_scale: f64,
}

fn unit() -> f64 {
    1.0
}

impl Variation {
    /// The unperturbed baseline.
    pub fn nominal() -> Self {
        Self::named(NOMINAL_VARIATION)
    }

    /// A variation with the given name and all factors at 1.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            jet_energy_scale: 1.0,
            muon_momentum_scale: 1.0,
            lepton_sf: 1.0,
            event_weight_scale: 1.0,
        }
    }

    /// `true` if this is the baseline hypothesis.
    pub fn is_nominal(&self) -> bool {
        self.name == NOMINAL_VARIATION
    }

    fn validate(&self) -> Result<()> {
        if self.name.is_empty() || self.name.contains('/') {
            return Err(Error::Config(format!(
                "variation name must be non-empty and must not contain '/': '{}'",
                self.name
            )));
        }
        let factors = [
            ("jet_energy_scale", self.jet_energy_scale),
            ("muon_momentum_scale", self.muon_momentum_scale),
            ("lepton_sf", self.lepton_sf),
            ("event_weight_scale", self.event_weight_scale),
        ];
        for (label, v) in factors {
            if !v.is_finite() || v <= 0.0 {
                return Err(Error::Config(format!(
                    "variation '{}': {label} must be finite and > 0, got {v}",
                    self.name
                )));
            }
        }
        Ok(())
    }
}

/// Finite, ordered set of variations with the nominal one first.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct VariationSet {
    variations: Vec<Variation>,
}

impl VariationSet {
    /// Validate and wrap a list of variations.
    ///
    /// The list must be non-empty, start with [`NOMINAL_VARIATION`] and carry
    /// unique names.
    pub fn new(variations: Vec<Variation>) -> Result<Self> {
        let first = variations
            .first()
            .ok_or_else(|| Error::Config("variation list is empty".into()))?;
        if !first.is_nominal() {
            return Err(Error::Config(format!(
                "first variation must be '{NOMINAL_VARIATION}', got '{}'",
                first.name
            )));
        }
        let mut seen = HashSet::with_capacity(variations.len());
        for v in &variations {
            v.validate()?;
            if !seen.insert(v.name.as_str()) {
                return Err(Error::Config(format!("duplicate variation name: '{}'", v.name)));
            }
        }
        Ok(Self { variations })
    }

    /// Set containing only the baseline.
    pub fn nominal_only() -> Self {
        Self { variations: vec![Variation::nominal()] }
    }

    /// The baseline variation.
    pub fn nominal(&self) -> &Variation {
        &self.variations[0]
    }

    /// Drop every non-nominal variation.
    pub fn restrict_to_nominal(&mut self) {
        self.variations.truncate(1);
    }

    /// Iterate in execution order.
    pub fn iter(&self) -> std::slice::Iter<'_, Variation> {
        self.variations.iter()
    }

    /// Number of variations.
    pub fn len(&self) -> usize {
        self.variations.len()
    }

    /// Always `false`: a valid set holds at least the nominal variation.
    pub fn is_empty(&self) -> bool {
        self.variations.is_empty()
    }

    /// Variation names in execution order.
    pub fn names(&self) -> Vec<&str> {
        self.variations.iter().map(|v| v.name.as_str()).collect()
    }
}

impl Default for VariationSet {
    fn default() -> Self {
        Self::nominal_only()
    }
}

impl<'de> Deserialize<'de> for VariationSet {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let variations = Vec::<Variation>::deserialize(deserializer)?;
        VariationSet::new(variations).map_err(serde::de::Error::custom)
    }
}

impl<'a> IntoIterator for &'a VariationSet {
    type Item = &'a Variation;
    type IntoIter = std::slice::Iter<'a, Variation>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_era_roundtrip_labels() {
        for era in Era::ALL {
            assert_eq!(era.as_str().parse::<Era>().unwrap(), era);
        }
    }

    #[test]
    fn test_unknown_era_is_config_error() {
        let err = "2019".parse::<Era>().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("2019"));
    }

    #[test]
    fn test_binning_edges() {
        let b = Binning::new(4, 0.0, 2.0).unwrap();
        assert_eq!(b.edges(), vec![0.0, 0.5, 1.0, 1.5, 2.0]);
        assert_eq!(b.width(), 0.5);
        assert!(Binning::new(0, 0.0, 1.0).is_err());
        assert!(Binning::new(3, 1.0, 1.0).is_err());
    }

    #[test]
    fn test_variation_set_requires_nominal_first() {
        let err = VariationSet::new(vec![Variation::named("JetEnUp"), Variation::nominal()])
            .unwrap_err();
        assert!(err.to_string().contains("first variation"));
        assert!(VariationSet::new(vec![]).is_err());
    }

    #[test]
    fn test_variation_set_rejects_duplicates_and_bad_factors() {
        let dup = VariationSet::new(vec![
            Variation::nominal(),
            Variation::named("JetEnUp"),
            Variation::named("JetEnUp"),
        ]);
        assert!(dup.is_err());

        let mut bad = Variation::named("JetEnUp");
        bad.jet_energy_scale = -1.0;
        assert!(VariationSet::new(vec![Variation::nominal(), bad]).is_err());
    }

    #[test]
    fn test_variation_set_deserialize_defaults() {
        let json = r#"[{"name": "Central"}, {"name": "JetEnUp", "jet_energy_scale": 1.05}]"#;
        let set: VariationSet = serde_json::from_str(json).unwrap();
        assert_eq!(set.names(), vec!["Central", "JetEnUp"]);
        let up = set.iter().nth(1).unwrap();
        assert_eq!(up.jet_energy_scale, 1.05);
        assert_eq!(up.lepton_sf, 1.0);

        let mut set = set;
        set.restrict_to_nominal();
        assert_eq!(set.len(), 1);
        assert!(set.nominal().is_nominal());
    }
}
