//! Semileptonic tt̄ → μν b b j j selection and reconstruction.

use es_core::{Binning, HistogramSink};
use es_physics::{
    FourMomentum, JetId, Kinematic, KinematicCuts, LeptonId, Met, VisibleSystem, filter_by,
    invariant_mass, mt_full_system, mt_scalar_et, mt_w, remove_cross_overlap, select_with_ids,
    sort_by_pt,
};
use serde::{Deserialize, Serialize};

use crate::analyses::{BTagCut, default_triggers};
use crate::driver::{Analysis, Outcome, VariationContext, VariationScope};

const STAGES: &[&str] = &["Initial", "Trigger", "Muon", "TwoBJets", "TwoLightJets", "MET"];

const MT_TTBAR_BINNING: Binning = Binning::uniform(100, 0.0, 2000.0);
const MT_W_BINNING: Binning = Binning::uniform(100, 0.0, 200.0);
const M_HAD_BINNING: Binning = Binning::uniform(100, 0.0, 500.0);
const M_VIS_BINNING: Binning = Binning::uniform(100, 0.0, 2000.0);
const HT_BINNING: Binning = Binning::uniform(100, 0.0, 1500.0);
const RATIO_BINNING: Binning = Binning::uniform(100, 0.0, 1.0);
const BALANCE_BINNING: Binning = Binning::uniform(100, -1.0, 1.0);
const PT_BINNING: Binning = Binning::uniform(100, 0.0, 500.0);

/// Tunable thresholds of the tt̄ selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TtbarCuts {
    /// Muon kinematic window.
    pub muon: KinematicCuts,
    /// Muon identification criteria.
    pub muon_ids: Vec<LeptonId>,
    /// Jet kinematic window.
    pub jet: KinematicCuts,
    /// Jet identification criteria.
    pub jet_ids: Vec<JetId>,
    /// b-tag working point.
    pub btag: BTagCut,
    /// ΔR for jet–muon and light-jet–b-jet cleaning.
    pub overlap_dr: f64,
    /// MET must be strictly above this.
    pub met_min: f64,
}

impl Default for TtbarCuts {
    fn default() -> Self {
        Self {
            muon: KinematicCuts::new(30.0, 2.5),
            muon_ids: vec![LeptonId::PogTight],
            jet: KinematicCuts::new(30.0, 2.5),
            jet_ids: vec![JetId::TightLepVeto],
            btag: BTagCut::default(),
            overlap_dr: 0.4,
            met_min: 30.0,
        }
    }
}

/// Observables of a reconstructed μ + 2b + 2j + MET system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TtbarObservables {
    /// Full-system transverse mass (clamped).
    pub mt_ttbar_v1: f64,
    /// Scalar-ET transverse mass (unclamped, may be `NaN`).
    pub mt_ttbar_v2: f64,
    /// W transverse mass of muon + MET.
    pub mt_w: f64,
    /// Mass of b1 + j1 + j2.
    pub m_hadronic: f64,
    /// Mass of the visible system.
    pub m_visible: f64,
    /// Visible scalar pT sum.
    pub ht: f64,
    /// HT + MET.
    pub st: f64,
    /// MET / HT.
    pub met_over_ht: f64,
    /// Visible vector pT sum.
    pub pt_visible: f64,
    /// (MET − pt_vis) / (MET + pt_vis).
    pub met_vis_balance: f64,
}

impl TtbarObservables {
    /// Compute from the leading muon, two b-jets, two light jets, and MET.
    pub fn compute(
        muon: &FourMomentum,
        b: [&FourMomentum; 2],
        j: [&FourMomentum; 2],
        met: &Met,
    ) -> Self {
        let visible = [*muon, *b[0], *b[1], *j[0], *j[1]];
        let sys = VisibleSystem::new(&visible, met);
        Self {
            mt_ttbar_v1: mt_full_system(&visible, met),
            mt_ttbar_v2: mt_scalar_et(&visible, met),
            mt_w: mt_w(muon, met),
            m_hadronic: invariant_mass(&[*b[0], *j[0], *j[1]]),
            m_visible: invariant_mass(&visible),
            ht: sys.ht(),
            st: sys.st(),
            met_over_ht: sys.met_over_ht(),
            pt_visible: sys.pt_visible(),
            met_vis_balance: sys.balance(),
        }
    }
}

/// One tight muon, two b-tagged and two light jets, and MET.
#[derive(Debug, Clone)]
pub struct Ttbar {
    cuts: TtbarCuts,
    triggers: Vec<String>,
}

impl Ttbar {
    /// Name in run cards and output.
    pub const NAME: &'static str = "ttbar";

    /// Selection with the given cuts and trigger paths (OR).
    pub fn new(cuts: TtbarCuts, triggers: Option<Vec<String>>) -> Self {
        Self { cuts, triggers: triggers.unwrap_or_else(|| default_triggers(&["HLT_IsoMu24"])) }
    }
}

impl Analysis for Ttbar {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn stages(&self) -> &'static [&'static str] {
        STAGES
    }

    fn execute(&self, ctx: &VariationContext<'_>, out: &mut VariationScope<'_>) -> Outcome {
        let c = &self.cuts;
        out.pass(0);
        if !ctx.fired_any(&self.triggers) {
            return Outcome::Rejected { cut: "Trigger" };
        }
        out.pass(1);

        let muons = sort_by_pt(select_with_ids(&ctx.objects.muons, c.muon, &c.muon_ids));
        let Some(muon) = muons.first() else {
            return Outcome::Rejected { cut: "Muon" };
        };
        out.pass(2);

        let jets = select_with_ids(&ctx.objects.jets, c.jet, &c.jet_ids);
        let jets = remove_cross_overlap(&jets, &muons, c.overlap_dr);
        let bjets = sort_by_pt(filter_by(&jets, |j| c.btag.accepts(j)));
        let [b1, b2, ..] = bjets.as_slice() else {
            return Outcome::Rejected { cut: "TwoBJets" };
        };
        out.pass(3);

        let light = sort_by_pt(remove_cross_overlap(&jets, &bjets, c.overlap_dr));
        let [j1, j2, ..] = light.as_slice() else {
            return Outcome::Rejected { cut: "TwoLightJets" };
        };
        out.pass(4);

        if ctx.met.pt <= c.met_min {
            return Outcome::Rejected { cut: "MET" };
        }
        out.pass(5);

        let obs = TtbarObservables::compute(&muon.p4, [&b1.p4, &b2.p4], [&j1.p4, &j2.p4], &ctx.met);
        let w = ctx.event_weight([muon]);

        out.fill("TTbarTransverseMass_v1", obs.mt_ttbar_v1, w, MT_TTBAR_BINNING);
        out.fill("TTbarTransverseMass_v2", obs.mt_ttbar_v2, w, MT_TTBAR_BINNING);
        out.fill("WTransverseMass", obs.mt_w, w, MT_W_BINNING);
        out.fill("HadronicMass", obs.m_hadronic, w, M_HAD_BINNING);
        out.fill("VisibleMass", obs.m_visible, w, M_VIS_BINNING);
        out.fill("HT", obs.ht, w, HT_BINNING);
        out.fill("ST", obs.st, w, HT_BINNING);
        out.fill("MET_over_HT", obs.met_over_ht, w, RATIO_BINNING);
        out.fill("VisiblePt", obs.pt_visible, w, PT_BINNING);
        out.fill("MET_VisBalance", obs.met_vis_balance, w, BALANCE_BINNING);

        out.fill("LeadingMuonPt", muon.pt(), w, PT_BINNING);
        out.fill("LeadingBJetPt", b1.pt(), w, PT_BINNING);
        out.fill("SubleadingBJetPt", b2.pt(), w, PT_BINNING);
        out.fill("LeadingLightJetPt", j1.pt(), w, PT_BINNING);
        out.fill("SubleadingLightJetPt", j2.pt(), w, PT_BINNING);
        out.fill("MET", ctx.met.pt, w, PT_BINNING);
        Outcome::Accepted
    }
}
