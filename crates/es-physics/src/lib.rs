//! # es-physics
//!
//! Reconstructed-object model and the per-event selection pipeline of evsel:
//! object filters, angular-overlap removal, combinatorial candidate choice,
//! and invariant/transverse-mass observables.
//!
//! ## Example
//!
//! ```
//! use es_physics::{FourMomentum, Lepton, best_pair_by_fit_quality, invariant_mass};
//!
//! let muons = vec![
//!     Lepton::muon(FourMomentum::from_pt_eta_phi_m(45.0, 0.1, 0.0, 0.105), 1).with_bs_chi2(0.8),
//!     Lepton::muon(FourMomentum::from_pt_eta_phi_m(40.0, -0.3, 3.0, 0.105), -1).with_bs_chi2(1.1),
//! ];
//! let pair = best_pair_by_fit_quality(&muons).expect("opposite-sign pair");
//! let mll = invariant_mass(&[pair.objects.leading.p4, pair.objects.subleading.p4]);
//! assert!(mll > 0.0);
//! ```
//!
//! Every routine is a pure function of its inputs; collections are never
//! filtered in place.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod candidate;
pub mod four_momentum;
pub mod kinematics;
pub mod met;
pub mod object;
pub mod overlap;
pub mod selection;
pub mod tagging;

pub use candidate::{Candidate, Pair, SelectionRule, best_pair_by_fit_quality, leading, sort_by_pt};
pub use four_momentum::{FourMomentum, PtEtaPhiM, delta_phi};
pub use kinematics::{
    MASS_NOT_COMPUTABLE, VisibleSystem, heavy_resonance_mass, invariant_mass, mt_full_system,
    mt_scalar_et, mt_w,
};
pub use met::Met;
pub use object::{
    Charged, FatJet, FitQuality, Identify, Jet, JetId, Kinematic, Lepton, LeptonFlavor, LeptonId,
    LeptonIdFlags,
};
pub use overlap::{OverlapPolicy, remove_cross_overlap, remove_self_overlap};
pub use selection::{KinematicCuts, filter_by, select, select_with_ids};
pub use tagging::{
    FatJetScores, FatJetTagger, FlavorScores, JetFlavTagger, SUPPORTED_FATJET_SCORES, TagTarget,
    TaggerKey,
};

/// es-physics version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
