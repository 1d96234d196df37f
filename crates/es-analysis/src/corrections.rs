//! Per-variation object copies.
//!
//! Objects are fetched once per event; every variation then works on its own
//! scaled copy so nothing leaks from one hypothesis into the next.

use es_core::Variation;
use es_physics::{FatJet, Jet, Lepton};

use crate::provider::ObjectProvider;

/// Owned object collections for one event (or one variation of it).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventObjects {
    /// Muons.
    pub muons: Vec<Lepton>,
    /// AK4 jets.
    pub jets: Vec<Jet>,
    /// AK8 jets.
    pub fatjets: Vec<FatJet>,
}

impl EventObjects {
    /// Copy the collections out of a provider.
    pub fn fetch<P: ObjectProvider + ?Sized>(provider: &P) -> Self {
        Self {
            muons: provider.muons().to_vec(),
            jets: provider.jets().to_vec(),
            fatjets: provider.fatjets().to_vec(),
        }
    }

    /// Fresh copy with the variation's momentum scales applied.
    pub fn corrected(&self, variation: &Variation) -> Self {
        let mu = variation.muon_momentum_scale;
        let jes = variation.jet_energy_scale;
        Self {
            muons: self.muons.iter().map(|m| m.with_p4(m.p4.scaled(mu))).collect(),
            jets: self.jets.iter().map(|j| j.with_p4(j.p4.scaled(jes))).collect(),
            fatjets: self.fatjets.iter().map(|fj| fj.with_p4(fj.p4.scaled(jes))).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::EventRecord;
    use approx::assert_relative_eq;
    use es_physics::{FourMomentum, Kinematic};

    #[test]
    fn scales_apply_per_collection() {
        let ev = EventRecord {
            muons: vec![Lepton::muon(FourMomentum::from_pt_eta_phi_m(40.0, 0.0, 0.0, 0.105), 1)],
            jets: vec![Jet::new(FourMomentum::from_pt_eta_phi_m(100.0, 1.0, 2.0, 10.0))],
            fatjets: vec![FatJet::new(FourMomentum::from_pt_eta_phi_m(400.0, 0.5, -1.0, 170.0), 165.0)],
            ..Default::default()
        };
        let base = EventObjects::fetch(&ev);
        let up = base.corrected(&Variation {
            jet_energy_scale: 1.05,
            muon_momentum_scale: 0.99,
            ..Variation::named("Up")
        });
        assert_relative_eq!(up.muons[0].pt(), 39.6, epsilon = 1e-9);
        assert_relative_eq!(up.jets[0].pt(), 105.0, epsilon = 1e-9);
        assert_relative_eq!(up.fatjets[0].sd_mass(), 165.0 * 1.05, epsilon = 1e-9);
        // source collections untouched
        assert_relative_eq!(base.jets[0].pt(), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn nominal_copy_is_identical() {
        let ev = EventRecord {
            jets: vec![Jet::new(FourMomentum::from_pt_eta_phi_m(55.0, -0.4, 0.3, 8.0))],
            ..Default::default()
        };
        let base = EventObjects::fetch(&ev);
        assert_eq!(base.corrected(&Variation::nominal()), base);
    }
}
