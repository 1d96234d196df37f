//! Invariant- and transverse-mass observables.
//!
//! Everything here is a pure function of four-momenta and MET.

use crate::four_momentum::{FourMomentum, delta_phi};
use crate::met::Met;
use crate::object::Kinematic;

/// Returned by [`heavy_resonance_mass`] when an input collection is too small.
pub const MASS_NOT_COMPUTABLE: f64 = -1.0;

/// Mass of the four-momentum sum.
pub fn invariant_mass(parts: &[FourMomentum]) -> f64 {
    parts.iter().sum::<FourMomentum>().mass()
}

/// Mass of leading lepton pair + leading jet + leading fat jet.
///
/// Returns [`MASS_NOT_COMPUTABLE`] if fewer than two leptons, or no jet or no
/// fat jet, are supplied. Inputs are expected to be pT-ordered already.
pub fn heavy_resonance_mass<L, J, F>(leptons: &[L], jets: &[J], fatjets: &[F]) -> f64
where
    L: Kinematic,
    J: Kinematic,
    F: Kinematic,
{
    match (leptons, jets.first(), fatjets.first()) {
        ([l1, l2, ..], Some(j), Some(fj)) => invariant_mass(&[*l1.p4(), *l2.p4(), *j.p4(), *fj.p4()]),
        _ => MASS_NOT_COMPUTABLE,
    }
}

/// Full-system transverse mass.
///
/// `mt² = E_vis² − pz_vis² + pt_total² − pt_vis²` where "total" adds the MET
/// vector to the visible sum. Negative `mt²` is clamped to zero. Depends on the
/// visible objects only through their sum, so it is invariant under relabelling.
pub fn mt_full_system(visible: &[FourMomentum], met: &Met) -> f64 {
    let vis: FourMomentum = visible.iter().sum();
    let px = vis.px() + met.px();
    let py = vis.py() + met.py();
    let mt2 = vis.e() * vis.e() - vis.pz() * vis.pz() + (px * px + py * py) - vis.pt2();
    mt2.max(0.0).sqrt()
}

/// Scalar-ET transverse mass, `sqrt(ΣET² − |Σpt|²)` with MET included in both
/// sums.
///
/// Not clamped: degenerate inputs with `ΣET < |Σpt|` yield `NaN`. This is a
/// different observable from [`mt_full_system`] and the two must not be
/// harmonised.
pub fn mt_scalar_et(visible: &[FourMomentum], met: &Met) -> f64 {
    let et_total: f64 = visible.iter().map(FourMomentum::et).sum::<f64>() + met.pt;
    let px = visible.iter().map(FourMomentum::px).sum::<f64>() + met.px();
    let py = visible.iter().map(FourMomentum::py).sum::<f64>() + met.py();
    (et_total * et_total - (px * px + py * py)).sqrt()
}

/// W-boson transverse mass `sqrt(2 pt_l MET (1 − cos Δφ))`.
pub fn mt_w(lepton: &FourMomentum, met: &Met) -> f64 {
    let dphi = delta_phi(lepton.phi(), met.phi);
    (2.0 * lepton.pt() * met.pt * (1.0 - dphi.cos())).sqrt()
}

/// Aggregate observables of a visible system recoiling against MET.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleSystem {
    ht: f64,
    pt: f64,
    met: f64,
}

impl VisibleSystem {
    /// Aggregate `visible` against `met`.
    pub fn new(visible: &[FourMomentum], met: &Met) -> Self {
        let ht = visible.iter().map(FourMomentum::pt).sum();
        let pt = visible.iter().sum::<FourMomentum>().pt();
        Self { ht, pt, met: met.pt }
    }

    /// Scalar pT sum of the visible objects.
    pub fn ht(&self) -> f64 {
        self.ht
    }

    /// HT plus MET.
    pub fn st(&self) -> f64 {
        self.ht + self.met
    }

    /// Magnitude of the visible pT vector sum.
    pub fn pt_visible(&self) -> f64 {
        self.pt
    }

    /// `MET / HT` (infinite or `NaN` for an empty visible system).
    pub fn met_over_ht(&self) -> f64 {
        self.met / self.ht
    }

    /// `(MET − pt_vis) / (MET + pt_vis)`, in `[-1, 1]`.
    pub fn balance(&self) -> f64 {
        (self.met - self.pt) / (self.met + self.pt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{FatJet, Jet, Lepton};
    use approx::assert_relative_eq;
    use proptest::prelude::*;
    use std::f64::consts::PI;

    fn p(pt: f64, eta: f64, phi: f64, m: f64) -> FourMomentum {
        FourMomentum::from_pt_eta_phi_m(pt, eta, phi, m)
    }

    #[test]
    fn w_transverse_mass_back_to_back() {
        let lep = p(50.0, 0.3, 0.0, 0.0);
        assert_relative_eq!(mt_w(&lep, &Met::new(50.0, PI)), 100.0, epsilon = 1e-9);
        assert_relative_eq!(mt_w(&lep, &Met::new(50.0, 0.0)), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn invariant_mass_of_empty_group_is_zero() {
        assert_eq!(invariant_mass(&[]), 0.0);
    }

    #[test]
    fn heavy_resonance_sentinel() {
        let leps = vec![Lepton::muon(p(300.0, 0.0, 0.0, 0.1), 1), Lepton::muon(p(200.0, 0.5, 2.0, 0.1), -1)];
        let jets = vec![Jet::new(p(150.0, -0.2, -1.0, 10.0))];
        let fjs = vec![FatJet::new(p(500.0, 0.1, 3.0, 172.0), 170.0)];
        let none: Vec<Jet> = Vec::new();

        assert_eq!(heavy_resonance_mass(&leps[..1], &jets, &fjs), MASS_NOT_COMPUTABLE);
        assert_eq!(heavy_resonance_mass(&leps, &none, &fjs), MASS_NOT_COMPUTABLE);
        assert_eq!(heavy_resonance_mass(&leps, &jets, &Vec::<FatJet>::new()), MASS_NOT_COMPUTABLE);

        let m = heavy_resonance_mass(&leps, &jets, &fjs);
        let expected = invariant_mass(&[leps[0].p4, leps[1].p4, jets[0].p4, fjs[0].p4]);
        assert_relative_eq!(m, expected, epsilon = 1e-9);
        assert!(m > 0.0);
    }

    #[test]
    fn full_system_mt_is_visible_mass_plus_total_pt() {
        // mt² = m_vis² + pt_total²
        let vis = [p(40.0, 0.0, 0.0, 0.0)];
        assert_relative_eq!(mt_full_system(&vis, &Met::new(40.0, 0.0)), 80.0, epsilon = 1e-9);
        assert_relative_eq!(mt_full_system(&vis, &Met::new(40.0, PI)), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn full_system_mt_clamps() {
        let vis = [FourMomentum::new(30.0, 0.0, 0.0, 1.0)];
        assert_eq!(mt_full_system(&vis, &Met::new(30.0, PI)), 0.0);
    }

    #[test]
    fn scalar_et_mt_is_not_clamped() {
        // spacelike input: ET would be E·pt/|p| = 1, pt = 30
        let vis = [FourMomentum::new(30.0, 0.0, 0.0, 1.0)];
        assert!(mt_scalar_et(&vis, &Met::new(0.0, 0.0)).is_nan());
    }

    #[test]
    fn scalar_et_mt_massless_back_to_back() {
        let vis = [p(40.0, 1.0, 0.0, 0.0)];
        assert_relative_eq!(mt_scalar_et(&vis, &Met::new(40.0, PI)), 80.0, epsilon = 1e-9);
    }

    #[test]
    fn visible_system_observables() {
        let vis = [p(60.0, 0.0, 0.0, 0.0), p(40.0, 1.0, PI, 0.0)];
        let sys = VisibleSystem::new(&vis, &Met::new(20.0, 0.0));
        assert_relative_eq!(sys.ht(), 100.0, epsilon = 1e-9);
        assert_relative_eq!(sys.st(), 120.0, epsilon = 1e-9);
        assert_relative_eq!(sys.pt_visible(), 20.0, epsilon = 1e-9);
        assert_relative_eq!(sys.met_over_ht(), 0.2, epsilon = 1e-12);
        assert_relative_eq!(sys.balance(), 0.0, epsilon = 1e-9);
    }

    fn visible() -> impl Strategy<Value = Vec<FourMomentum>> {
        proptest::collection::vec(
            (1.0f64..300.0, -2.5f64..2.5, -PI..PI, 0.0f64..20.0).prop_map(|(pt, eta, phi, m)| p(pt, eta, phi, m)),
            1..6,
        )
    }

    proptest! {
        #[test]
        fn prop_full_system_mt_relabel_symmetric(
            vis in visible(),
            met_pt in 0.0f64..200.0,
            met_phi in -PI..PI,
            rot in 0usize..6,
        ) {
            let met = Met::new(met_pt, met_phi);
            let mut shuffled = vis.clone();
            shuffled.reverse();
            let k = rot % shuffled.len();
            shuffled.rotate_left(k);

            let a = mt_full_system(&vis, &met);
            let b = mt_full_system(&shuffled, &met);
            let scale: f64 = vis.iter().map(FourMomentum::e).sum::<f64>() + met_pt;
            prop_assert!((a * a - b * b).abs() <= 1e-9 * scale * scale);
        }

        #[test]
        fn prop_balance_bounded(vis in visible(), met_pt in 0.1f64..200.0, met_phi in -PI..PI) {
            let b = VisibleSystem::new(&vis, &Met::new(met_pt, met_phi)).balance();
            prop_assert!((-1.0..=1.0).contains(&b));
        }
    }
}
