//! Missing transverse momentum.

use serde::{Deserialize, Serialize};

use crate::four_momentum::FourMomentum;

/// Missing transverse momentum as a magnitude/azimuth pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Met {
    /// Magnitude.
    pub pt: f64,
    /// Azimuth.
    pub phi: f64,
}

impl Met {
    /// New MET value.
    pub const fn new(pt: f64, phi: f64) -> Self {
        Self { pt, phi }
    }

    /// x component.
    pub fn px(&self) -> f64 {
        self.pt * self.phi.cos()
    }

    /// y component.
    pub fn py(&self) -> f64 {
        self.pt * self.phi.sin()
    }

    /// Massless, purely transverse four-momentum.
    pub fn p4(&self) -> FourMomentum {
        FourMomentum::new(self.px(), self.py(), 0.0, self.pt.abs())
    }
}
