//! Left-right-symmetric W_R → t b selection in the dimuon channel.
//!
//! A boosted hadronic top is taken from the leading top-tagged fat jet; the
//! resonance mass combines it with the dimuon pair and the leading b-jet.

use es_core::{Binning, HistogramSink};
use es_physics::{
    FatJet, FatJetTagger, Identify, JetId, Kinematic, KinematicCuts, Lepton, LeptonId,
    OverlapPolicy, TagTarget, filter_by, heavy_resonance_mass, invariant_mass,
    remove_cross_overlap, remove_self_overlap, select, select_with_ids, sort_by_pt,
};
use serde::{Deserialize, Serialize};

use crate::analyses::{BTagCut, default_triggers};
use crate::driver::{Analysis, Outcome, VariationContext, VariationScope};

const STAGES: &[&str] = &[
    "Initial",
    "Trigger",
    "GoodMuon",
    "MuonKinematics",
    "DileptonMass",
    "TopJet",
    "BJet",
    "WRMass",
];

const ID_LEVEL_BINNING: Binning = Binning::uniform(10, -5.0, 5.0);
const ID_FLAG_BINNING: Binning = Binning::uniform(3, 0.0, 3.0);
const MULTIPLICITY_BINNING: Binning = Binning::uniform(10, 0.0, 10.0);
const SD_MASS_BINNING: Binning = Binning::uniform(100, 0.0, 1000.0);
const SCORE_BINNING: Binning = Binning::uniform(100, 0.0, 1.0);
const WR_MASS_BINNING: Binning = Binning::uniform(2000, 0.0, 2000.0);
const MLL_BINNING: Binning = Binning::uniform(5000, 0.0, 5000.0);
const PT_BINNING: Binning = Binning::uniform(5000, 0.0, 5000.0);

/// Boosted top-tag requirement on a fat jet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TopTagCut {
    /// Tagger providing the score.
    pub tagger: FatJetTagger,
    /// Discriminated hypothesis.
    pub target: TagTarget,
    /// Score must be strictly above this.
    pub score_min: f64,
    /// Open lower bound on the soft-drop mass.
    pub sd_mass_min: f64,
    /// Open upper bound on the soft-drop mass.
    pub sd_mass_max: f64,
}

impl Default for TopTagCut {
    fn default() -> Self {
        Self {
            tagger: FatJetTagger::ParticleNetWithMass,
            target: TagTarget::TVsQcd,
            score_min: 0.9,
            sd_mass_min: 120.0,
            sd_mass_max: 250.0,
        }
    }
}

impl TopTagCut {
    /// `true` if the fat jet is top-tagged. A missing score never tags.
    pub fn accepts(&self, fatjet: &FatJet) -> bool {
        let sd = fatjet.sd_mass();
        fatjet.tagger_score(self.tagger, self.target).is_ok_and(|s| s > self.score_min)
            && sd > self.sd_mass_min
            && sd < self.sd_mass_max
    }
}

/// Tunable thresholds of the W_R → tb selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LrsmCuts {
    /// Criteria at least one muon must pass.
    pub good_muon_ids: Vec<LeptonId>,
    /// ΔR for muon self-overlap and jet–muon cleaning.
    pub muon_overlap_dr: f64,
    /// Leading-muon pT must be strictly above this.
    pub leading_muon_pt_min: f64,
    /// Every muon must have |η| strictly below this.
    pub muon_abs_eta_max: f64,
    /// Dimuon mass must be strictly above this.
    pub mll_min: f64,
    /// Fat-jet kinematic window.
    pub fatjet: KinematicCuts,
    /// ΔR for fat-jet–muon and jet–top cleaning.
    pub fatjet_overlap_dr: f64,
    /// Top-tag requirement.
    pub top_tag: TopTagCut,
    /// Jet kinematic window.
    pub jet: KinematicCuts,
    /// Jet identification criteria.
    pub jet_ids: Vec<JetId>,
    /// b-tag working point.
    pub btag: BTagCut,
    /// WR mass must be strictly above this when the cut is enabled.
    pub wr_mass_min: f64,
}

impl Default for LrsmCuts {
    fn default() -> Self {
        Self {
            good_muon_ids: vec![LeptonId::PogGlobalHighPt, LeptonId::PogTkIsoTight],
            muon_overlap_dr: 0.4,
            leading_muon_pt_min: 50.0,
            muon_abs_eta_max: 2.5,
            mll_min: 50.0,
            fatjet: KinematicCuts::new(30.0, 2.5),
            fatjet_overlap_dr: 0.8,
            top_tag: TopTagCut::default(),
            jet: KinematicCuts::new(30.0, 2.5),
            jet_ids: vec![JetId::NoCut],
            btag: BTagCut::default(),
            wr_mass_min: 2000.0,
        }
    }
}

/// Two high-pT muons, a top-tagged fat jet, and a b-jet.
#[derive(Debug, Clone)]
pub struct LrsmTb {
    cuts: LrsmCuts,
    triggers: Vec<String>,
    run_wr_cut: bool,
}

impl LrsmTb {
    /// Name in run cards and output.
    pub const NAME: &'static str = "lrsm_tb";

    /// Selection with the given cuts and trigger paths (OR). The WR mass
    /// threshold only applies when `run_wr_cut` is set.
    pub fn new(cuts: LrsmCuts, triggers: Option<Vec<String>>, run_wr_cut: bool) -> Self {
        let triggers = triggers.unwrap_or_else(|| {
            default_triggers(&["HLT_Mu50", "HLT_CascadeMu100", "HLT_HighPtTkMu100"])
        });
        Self { cuts, triggers, run_wr_cut }
    }

    fn fill_muon_ids(out: &mut VariationScope<'_>, muons: &[Lepton]) {
        let flag = |b: bool| if b { 1.0 } else { 0.0 };
        for mu in muons {
            out.fill("Muon_HighPtId", f64::from(mu.id.high_pt_id), 1.0, ID_LEVEL_BINNING);
            out.fill("Muon_TkIsoId", f64::from(mu.id.tk_iso_id), 1.0, ID_LEVEL_BINNING);
            out.fill("Muon_TightId", flag(mu.id.tight), 1.0, ID_FLAG_BINNING);
            out.fill("Muon_MediumId", flag(mu.id.medium), 1.0, ID_FLAG_BINNING);
            out.fill("Muon_LooseId", flag(mu.id.loose), 1.0, ID_FLAG_BINNING);
        }
    }

    fn fill_fatjet_tags(&self, out: &mut VariationScope<'_>, prefix: &str, fatjets: &[FatJet]) {
        let tag = &self.cuts.top_tag;
        for fj in fatjets {
            out.fill(&format!("{prefix}_SoftDropMass"), fj.sd_mass(), 1.0, SD_MASS_BINNING);
            if let Ok(score) = fj.tagger_score(tag.tagger, tag.target) {
                out.fill(&format!("{prefix}_TopTagScore"), score, 1.0, SCORE_BINNING);
            }
        }
    }
}

impl Analysis for LrsmTb {
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

        Self::fill_muon_ids(out, &ctx.objects.muons);
        if !ctx.objects.muons.iter().any(|m| m.passes_all(c.good_muon_ids.as_slice())) {
            return Outcome::Rejected { cut: "GoodMuon" };
        }
        out.pass(2);

        let muons = remove_self_overlap(
            &ctx.objects.muons,
            c.muon_overlap_dr,
            OverlapPolicy::ForwardOnlyRemoval,
        );
        let muons = sort_by_pt(muons);
        let [mu1, mu2, ..] = muons.as_slice() else {
            return Outcome::Rejected { cut: "MuonKinematics" };
        };
        if mu1.pt() <= c.leading_muon_pt_min
            || muons.iter().any(|m| m.eta().abs() >= c.muon_abs_eta_max)
        {
            return Outcome::Rejected { cut: "MuonKinematics" };
        }
        out.pass(3);

        let dimuon = [mu1.clone(), mu2.clone()];
        let mll = invariant_mass(&[mu1.p4, mu2.p4]);
        if mll <= c.mll_min {
            return Outcome::Rejected { cut: "DileptonMass" };
        }
        out.pass(4);

        let fatjets = select(&ctx.objects.fatjets, c.fatjet, |_| true);
        out.fill("FatJetnum", fatjets.len() as f64, 1.0, MULTIPLICITY_BINNING);
        let fatjets = remove_cross_overlap(&fatjets, &dimuon, c.fatjet_overlap_dr);
        out.fill("FatJetnum_afterOverlap", fatjets.len() as f64, 1.0, MULTIPLICITY_BINNING);
        self.fill_fatjet_tags(out, "FatJet", &fatjets);

        let tops = sort_by_pt(filter_by(&fatjets, |fj| c.top_tag.accepts(fj)));
        self.fill_fatjet_tags(out, "TopJet", &tops);
        let Some(top) = tops.first() else {
            return Outcome::Rejected { cut: "TopJet" };
        };
        out.pass(5);

        let jets = select_with_ids(&ctx.objects.jets, c.jet, &c.jet_ids);
        let jets = remove_cross_overlap(&jets, &dimuon, c.muon_overlap_dr);
        let jets = remove_cross_overlap(&jets, std::slice::from_ref(top), c.fatjet_overlap_dr);
        let bjets = sort_by_pt(filter_by(&jets, |j| c.btag.accepts(j)));
        let Some(b1) = bjets.first() else {
            return Outcome::Rejected { cut: "BJet" };
        };
        out.pass(6);

        let wr_mass = heavy_resonance_mass(&dimuon, &bjets, &tops);
        if wr_mass < 0.0 || (self.run_wr_cut && wr_mass <= c.wr_mass_min) {
            return Outcome::Rejected { cut: "WRMass" };
        }
        out.pass(7);

        let w = ctx.event_weight(&dimuon);
        out.fill("Bjetnum", bjets.len() as f64, w, MULTIPLICITY_BINNING);
        out.fill("Topjetnum", tops.len() as f64, w, MULTIPLICITY_BINNING);
        out.fill("WRMass", wr_mass, w, WR_MASS_BINNING);
        out.fill("DileptonMass", mll, w, MLL_BINNING);
        out.fill("LeadingMuonPt", mu1.pt(), w, PT_BINNING);
        out.fill("SubleadingMuonPt", mu2.pt(), w, PT_BINNING);
        out.fill("LeadingBJetPt", b1.pt(), w, PT_BINNING);
        out.fill("LeadingTopJetPt", top.pt(), w, PT_BINNING);
        Outcome::Accepted
    }
}
