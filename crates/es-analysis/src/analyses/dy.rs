//! Drell–Yan → μμ selection.

use es_core::{Binning, HistogramSink};
use es_physics::{
    Kinematic, KinematicCuts, LeptonId, OverlapPolicy, best_pair_by_fit_quality, invariant_mass,
    remove_self_overlap, select_with_ids,
};
use serde::{Deserialize, Serialize};

use crate::analyses::default_triggers;
use crate::driver::{Analysis, Outcome, VariationContext, VariationScope};

const STAGES: &[&str] = &["Initial", "Trigger", "TwoMuons", "OppositeSignPair"];

const MASS_BINNING: Binning = Binning::uniform(3000, 0.0, 3000.0);
const PT_BINNING: Binning = Binning::uniform(500, 0.0, 500.0);

/// Tunable thresholds of the Drell–Yan selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DyCuts {
    /// Muon kinematic window.
    pub muon: KinematicCuts,
    /// Identification criteria every muon must pass.
    pub muon_ids: Vec<LeptonId>,
    /// ΔR below which two muons are considered the same object.
    pub overlap_dr: f64,
}

impl Default for DyCuts {
    fn default() -> Self {
        Self {
            muon: KinematicCuts::new(26.0, 2.4),
            muon_ids: vec![LeptonId::PogTight],
            overlap_dr: 0.4,
        }
    }
}

/// Exactly two well-identified muons forming an opposite-sign pair.
///
/// The pair is the one with the smallest summed beam-spot-constrained χ².
#[derive(Debug, Clone)]
pub struct DrellYan {
    cuts: DyCuts,
    triggers: Vec<String>,
}

impl DrellYan {
    /// Name in run cards and output.
    pub const NAME: &'static str = "dy";

    /// Selection with the given cuts and trigger paths (OR).
    pub fn new(cuts: DyCuts, triggers: Option<Vec<String>>) -> Self {
        Self { cuts, triggers: triggers.unwrap_or_else(|| default_triggers(&["HLT_IsoMu24"])) }
    }
}

impl Analysis for DrellYan {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn stages(&self) -> &'static [&'static str] {
        STAGES
    }

    fn execute(&self, ctx: &VariationContext<'_>, out: &mut VariationScope<'_>) -> Outcome {
        out.pass(0);
        if !ctx.fired_any(&self.triggers) {
            return Outcome::Rejected { cut: "Trigger" };
        }
        out.pass(1);

        let muons = remove_self_overlap(
            &ctx.objects.muons,
            self.cuts.overlap_dr,
            OverlapPolicy::SymmetricMutualRemoval,
        );
        let muons = select_with_ids(&muons, self.cuts.muon, &self.cuts.muon_ids);
        if muons.len() != 2 {
            return Outcome::Rejected { cut: "TwoMuons" };
        }
        out.pass(2);

        let Some(z) = best_pair_by_fit_quality(&muons) else {
            return Outcome::Rejected { cut: "OppositeSignPair" };
        };
        out.pass(3);

        let (lead, sub) = (&z.objects.leading, &z.objects.subleading);
        let weight = ctx.event_weight([lead, sub]);
        out.fill("DileptonMass", invariant_mass(&[lead.p4, sub.p4]), weight, MASS_BINNING);
        out.fill("LeadingMuonPt", lead.pt(), weight, PT_BINNING);
        out.fill("SubleadingMuonPt", sub.pt(), weight, PT_BINNING);
        Outcome::Accepted
    }
}
