//! Concrete selections.
//!
//! - [`dy`]: Drell–Yan → μμ with best-χ² pair choice
//! - [`ttbar`]: semileptonic tt̄ with transverse-mass observables
//! - [`lrsm`]: left-right-symmetric W_R → tb with a top-tagged fat jet

pub mod dy;
pub mod lrsm;
pub mod ttbar;

use es_physics::{Jet, JetFlavTagger};
use serde::{Deserialize, Serialize};

pub use dy::{DrellYan, DyCuts};
pub use lrsm::{LrsmCuts, LrsmTb, TopTagCut};
pub use ttbar::{Ttbar, TtbarCuts, TtbarObservables};

/// ParticleNet AK4 medium working point.
pub const PNET_MEDIUM_WP: f64 = 0.6734;

/// b-tagging working point on one tagger.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BTagCut {
    /// Tagger whose score is cut on.
    pub tagger: JetFlavTagger,
    /// Jets with a score strictly above this are b-tagged.
    pub threshold: f64,
}

impl Default for BTagCut {
    fn default() -> Self {
        Self { tagger: JetFlavTagger::ParticleNet, threshold: PNET_MEDIUM_WP }
    }
}

impl BTagCut {
    /// `true` if the jet is b-tagged.
    pub fn accepts(&self, jet: &Jet) -> bool {
        jet.btag_score(self.tagger) > self.threshold
    }
}

fn default_triggers(paths: &[&str]) -> Vec<String> {
    paths.iter().map(|p| p.to_string()).collect()
}

#[cfg(test)]
pub(crate) mod test_support {
    use es_core::{Variation, VariationSet};
    use es_hist::HistogramSet;
    use es_physics::{FatJet, FatJetTagger, FlavorScores, FourMomentum, Jet, Lepton, LeptonIdFlags, TagTarget};

    use crate::cutflow::CutFlow;
    use crate::driver::{Analysis, Outcome, VariationDriver};
    use crate::provider::{EventRecord, RunWeights};

    pub fn muon(pt: f64, eta: f64, phi: f64, charge: i32, chi2: f64, id: LeptonIdFlags) -> Lepton {
        Lepton::muon(FourMomentum::from_pt_eta_phi_m(pt, eta, phi, 0.105), charge)
            .with_id(id)
            .with_bs_chi2(chi2)
    }

    pub fn jet(pt: f64, eta: f64, phi: f64, pnet: f64) -> Jet {
        Jet::new(FourMomentum::from_pt_eta_phi_m(pt, eta, phi, 8.0))
            .with_btag(FlavorScores { particle_net: pnet, ..Default::default() })
            .with_jet_id(0b110)
    }

    pub fn fatjet(pt: f64, eta: f64, phi: f64, sd_mass: f64, tvsqcd: f64) -> FatJet {
        FatJet::new(FourMomentum::from_pt_eta_phi_m(pt, eta, phi, sd_mass), sd_mass)
            .with_score(FatJetTagger::ParticleNetWithMass, TagTarget::TVsQcd, tvsqcd)
            .unwrap()
    }

    pub fn event(triggers: &[&str], muons: Vec<Lepton>) -> EventRecord {
        EventRecord {
            muons,
            triggers: triggers.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    /// Runs one analysis under the nominal variation only, as MC with unit
    /// normalisation.
    pub struct Harness<A: Analysis> {
        pub analysis: A,
        pub variations: VariationSet,
        pub hists: HistogramSet,
        pub cutflow: CutFlow,
    }

    impl<A: Analysis> Harness<A> {
        pub fn new(analysis: A) -> Self {
            let cutflow = CutFlow::new(analysis.stages());
            Self { analysis, variations: VariationSet::nominal_only(), hists: HistogramSet::new(), cutflow }
        }

        pub fn with_variations(mut self, variations: Vec<Variation>) -> Self {
            self.variations = VariationSet::new(variations).unwrap();
            self
        }

        pub fn run(&mut self, ev: &EventRecord) -> Vec<Outcome> {
            let weights = RunWeights { is_data: false, luminosity: 1.0 };
            let driver = VariationDriver::new(&self.analysis, &self.variations, &weights);
            driver.process(ev, &mut self.hists, &mut self.cutflow)
        }
    }
}
