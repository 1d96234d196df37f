//! Run card: which analysis to run, on what, and under which variations.

use std::path::Path;

use es_core::{Era, Error, Result, VariationSet};
use serde::{Deserialize, Serialize};

use crate::analyses::{DrellYan, DyCuts, LrsmCuts, LrsmTb, Ttbar, TtbarCuts};
use crate::driver::Analysis;
use crate::provider::RunWeights;

/// Selectable analyses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    /// Drell–Yan → μμ.
    Dy,
    /// Semileptonic tt̄.
    Ttbar,
    /// W_R → tb.
    LrsmTb,
}

impl AnalysisKind {
    /// Label used in run cards and output metadata.
    pub fn as_str(self) -> &'static str {
        match self {
            AnalysisKind::Dy => DrellYan::NAME,
            AnalysisKind::Ttbar => Ttbar::NAME,
            AnalysisKind::LrsmTb => LrsmTb::NAME,
        }
    }
}

/// Behaviour switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Flags {
    /// Run every listed variation (simulation only).
    pub run_syst: bool,
    /// Apply the W_R mass threshold in the tb analysis.
    pub run_wr_cut: bool,
}

/// Per-analysis cut overrides. Omitted fields keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CutOverrides {
    /// Drell–Yan thresholds.
    pub dy: DyCuts,
    /// tt̄ thresholds.
    pub ttbar: TtbarCuts,
    /// W_R → tb thresholds.
    pub lrsm_tb: LrsmCuts,
}

/// Complete description of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunCard {
    /// Analysis to execute.
    pub analysis: AnalysisKind,
    /// Data-taking period.
    pub era: Era,
    /// Collision data rather than simulation.
    #[serde(default)]
    pub is_data: bool,
    /// Normalisation applied to every simulated event.
    #[serde(default = "default_luminosity")]
    pub luminosity: f64,
    /// Trigger paths (OR); `None` uses the analysis defaults.
    #[serde(default)]
    pub triggers: Option<Vec<String>>,
    /// Behaviour switches.
    #[serde(default)]
    pub flags: Flags,
    /// Worker threads (0 = auto). Use 1 for deterministic summation order.
    #[serde(default = "default_threads")]
    pub threads: usize,
    /// Cut overrides.
    #[serde(default)]
    pub cuts: CutOverrides,
    /// Variations in execution order, nominal first.
    #[serde(default)]
    pub variations: VariationSet,
}

fn default_luminosity() -> f64 {
    1.0
}

fn default_threads() -> usize {
    1
}

impl RunCard {
    /// Read a run card: JSON when the extension is `.json`, YAML otherwise.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("").to_ascii_lowercase();
        let card: RunCard = if ext == "json" {
            serde_json::from_slice(&bytes)?
        } else {
            serde_yaml_ng::from_slice(&bytes)?
        };
        card.validate()?;
        Ok(card)
    }

    /// Checks beyond what deserialization enforces.
    pub fn validate(&self) -> Result<()> {
        if !self.luminosity.is_finite() || self.luminosity <= 0.0 {
            return Err(Error::Config(format!(
                "luminosity must be finite and > 0, got {}",
                self.luminosity
            )));
        }
        if let Some(triggers) = &self.triggers {
            if triggers.is_empty() {
                return Err(Error::Config("trigger list is empty".into()));
            }
            if triggers.iter().any(|t| t.trim().is_empty()) {
                return Err(Error::Config("trigger path names must be non-empty".into()));
            }
        }
        Ok(())
    }

    /// Variations that will actually be executed.
    ///
    /// Collision data, and runs without `run_syst`, only execute the nominal
    /// variation.
    pub fn effective_variations(&self) -> VariationSet {
        let mut set = self.variations.clone();
        if set.len() > 1 && (self.is_data || !self.flags.run_syst) {
            tracing::warn!(
                dropped = set.len() - 1,
                is_data = self.is_data,
                run_syst = self.flags.run_syst,
                "running nominal variation only"
            );
            set.restrict_to_nominal();
        }
        set
    }

    /// Weight provider for this run.
    pub fn weights(&self) -> RunWeights {
        RunWeights { is_data: self.is_data, luminosity: self.luminosity }
    }

    /// Instantiate the configured analysis.
    pub fn build_analysis(&self) -> Box<dyn Analysis> {
        let triggers = self.triggers.clone();
        match self.analysis {
            AnalysisKind::Dy => Box::new(DrellYan::new(self.cuts.dy.clone(), triggers)),
            AnalysisKind::Ttbar => Box::new(Ttbar::new(self.cuts.ttbar.clone(), triggers)),
            AnalysisKind::LrsmTb => {
                Box::new(LrsmTb::new(self.cuts.lrsm_tb.clone(), triggers, self.flags.run_wr_cut))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CARD: &str = r#"
analysis: lrsm_tb
era: "2018"
luminosity: 59.8
flags:
  run_syst: true
  run_wr_cut: true
cuts:
  lrsm_tb:
    mll_min: 200.0
variations:
  - name: Central
  - name: JetEnUp
    jet_energy_scale: 1.02
  - name: MuonIDSFDown
    lepton_sf: 0.97
"#;

    #[test]
    fn parse_yaml_card() {
        let card: RunCard = serde_yaml_ng::from_str(CARD).unwrap();
        card.validate().unwrap();
        assert_eq!(card.analysis, AnalysisKind::LrsmTb);
        assert_eq!(card.era, Era::Run2018);
        assert!(!card.is_data);
        assert_eq!(card.threads, 1);
        assert!(card.flags.run_wr_cut);
        assert_eq!(card.cuts.lrsm_tb.mll_min, 200.0);
        // untouched fields keep their defaults
        assert_eq!(card.cuts.lrsm_tb.fatjet_overlap_dr, 0.8);
        assert_eq!(card.cuts.dy, DyCuts::default());
        assert_eq!(card.effective_variations().names(), vec!["Central", "JetEnUp", "MuonIDSFDown"]);
        assert_eq!(card.build_analysis().name(), "lrsm_tb");
    }

    #[test]
    fn data_runs_nominal_only() {
        let mut card: RunCard = serde_yaml_ng::from_str(CARD).unwrap();
        card.is_data = true;
        assert_eq!(card.effective_variations().names(), vec!["Central"]);
        assert!(card.weights().is_data);

        card.is_data = false;
        card.flags.run_syst = false;
        assert_eq!(card.effective_variations().len(), 1);
    }

    #[test]
    fn unknown_era_is_rejected() {
        let err = serde_yaml_ng::from_str::<RunCard>("analysis: dy\nera: \"2031\"\n").unwrap_err();
        assert!(err.to_string().contains("unrecognized era"));
    }

    #[test]
    fn nominal_must_come_first() {
        let yaml = "analysis: dy\nera: \"2022\"\nvariations:\n  - name: JetEnUp\n  - name: Central\n";
        assert!(serde_yaml_ng::from_str::<RunCard>(yaml).is_err());
    }

    #[test]
    fn minimal_card_defaults() {
        let card: RunCard = serde_json::from_str(r#"{"analysis": "ttbar", "era": "2022EE"}"#).unwrap();
        assert_eq!(card.luminosity, 1.0);
        assert_eq!(card.variations.names(), vec!["Central"]);
        assert_eq!(card.analysis.as_str(), "ttbar");
        assert!(card.triggers.is_none());
    }

    #[test]
    fn invalid_luminosity_and_triggers() {
        let mut card: RunCard = serde_json::from_str(r#"{"analysis": "dy", "era": "2017"}"#).unwrap();
        card.luminosity = 0.0;
        assert!(matches!(card.validate(), Err(Error::Config(_))));
        card.luminosity = 1.0;
        card.triggers = Some(vec![]);
        assert!(card.validate().is_err());
        card.triggers = Some(vec!["HLT_IsoMu24".into()]);
        assert!(card.validate().is_ok());
    }
}
