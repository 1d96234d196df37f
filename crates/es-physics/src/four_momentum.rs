//! Lorentz four-momentum value type.

use std::f64::consts::PI;
use std::iter::Sum;
use std::ops::Add;

use serde::{Deserialize, Serialize};

/// Pseudorapidity reported for objects with zero transverse momentum.
const ETA_AT_ZERO_PT: f64 = 1e10;

/// Four-momentum `(px, py, pz, E)` in GeV.
///
/// Immutable: arithmetic always yields a new value. Serialised in the
/// `(pt, eta, phi, mass)` basis used by reconstructed-object tables.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "PtEtaPhiM", into = "PtEtaPhiM")]
pub struct FourMomentum {
    px: f64,
    py: f64,
    pz: f64,
    e: f64,
}

/// `(pt, eta, phi, mass)` representation of a four-momentum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PtEtaPhiM {
    /// Transverse momentum.
    pub pt: f64,
    /// Pseudorapidity.
    pub eta: f64,
    /// Azimuth.
    pub phi: f64,
    /// Invariant mass.
    #[serde(default)]
    pub mass: f64,
}

impl From<PtEtaPhiM> for FourMomentum {
    fn from(v: PtEtaPhiM) -> Self {
        FourMomentum::from_pt_eta_phi_m(v.pt, v.eta, v.phi, v.mass)
    }
}

impl From<FourMomentum> for PtEtaPhiM {
    fn from(p: FourMomentum) -> Self {
        PtEtaPhiM { pt: p.pt(), eta: p.eta(), phi: p.phi(), mass: p.mass() }
    }
}

impl FourMomentum {
    /// Construct from Cartesian components.
    pub const fn new(px: f64, py: f64, pz: f64, e: f64) -> Self {
        Self { px, py, pz, e }
    }

    /// Construct from `(pt, eta, phi, mass)`.
    pub fn from_pt_eta_phi_m(pt: f64, eta: f64, phi: f64, mass: f64) -> Self {
        let pt = pt.abs();
        let px = pt * phi.cos();
        let py = pt * phi.sin();
        let pz = pt * eta.sinh();
        let p2 = px * px + py * py + pz * pz;
        let e = if mass >= 0.0 {
            (p2 + mass * mass).sqrt()
        } else {
            // Spacelike input: keep E^2 - p^2 = -m^2 where possible.
            (p2 - mass * mass).max(0.0).sqrt()
        };
        Self { px, py, pz, e }
    }

    /// x component.
    pub fn px(&self) -> f64 {
        self.px
    }

    /// y component.
    pub fn py(&self) -> f64 {
        self.py
    }

    /// z (longitudinal) component.
    pub fn pz(&self) -> f64 {
        self.pz
    }

    /// Energy.
    pub fn e(&self) -> f64 {
        self.e
    }

    /// Transverse momentum squared.
    pub fn pt2(&self) -> f64 {
        self.px * self.px + self.py * self.py
    }

    /// Transverse momentum.
    pub fn pt(&self) -> f64 {
        self.px.hypot(self.py)
    }

    /// Azimuth in `(-π, π]`.
    pub fn phi(&self) -> f64 {
        if self.px == 0.0 && self.py == 0.0 { 0.0 } else { self.py.atan2(self.px) }
    }

    /// Pseudorapidity. Zero-pT objects get `±1e10` along the beam axis.
    pub fn eta(&self) -> f64 {
        let pt = self.pt();
        if pt > 0.0 {
            (self.pz / pt).asinh()
        } else if self.pz == 0.0 {
            0.0
        } else {
            ETA_AT_ZERO_PT.copysign(self.pz)
        }
    }

    /// `E² − |p|²`, possibly negative for numerically spacelike sums.
    pub fn mass2(&self) -> f64 {
        self.e * self.e - self.pt2() - self.pz * self.pz
    }

    /// Invariant mass, `sqrt(max(E² − |p|², 0))`.
    pub fn mass(&self) -> f64 {
        self.mass2().max(0.0).sqrt()
    }

    /// Transverse energy `E · pT / |p|` (zero when `pT = 0`).
    pub fn et(&self) -> f64 {
        let pt2 = self.pt2();
        if pt2 == 0.0 {
            return 0.0;
        }
        self.e * (pt2 / (pt2 + self.pz * self.pz)).sqrt()
    }

    /// All four components multiplied by `factor` (energy-scale variation).
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.px * factor, self.py * factor, self.pz * factor, self.e * factor)
    }

    /// Azimuthal separation wrapped to `(-π, π]`.
    pub fn delta_phi(&self, other: &FourMomentum) -> f64 {
        delta_phi(self.phi(), other.phi())
    }

    /// Angular distance `sqrt(Δη² + Δφ²)`.
    pub fn delta_r(&self, other: &FourMomentum) -> f64 {
        let deta = self.eta() - other.eta();
        let dphi = self.delta_phi(other);
        deta.hypot(dphi)
    }
}

/// `phi1 − phi2` wrapped to `(-π, π]`.
pub fn delta_phi(phi1: f64, phi2: f64) -> f64 {
    let mut d = (phi1 - phi2) % (2.0 * PI);
    if d > PI {
        d -= 2.0 * PI;
    } else if d <= -PI {
        d += 2.0 * PI;
    }
    d
}

impl Add for FourMomentum {
    type Output = FourMomentum;

    fn add(self, rhs: FourMomentum) -> FourMomentum {
        FourMomentum::new(self.px + rhs.px, self.py + rhs.py, self.pz + rhs.pz, self.e + rhs.e)
    }
}

impl<'a> Add<&'a FourMomentum> for FourMomentum {
    type Output = FourMomentum;

    fn add(self, rhs: &'a FourMomentum) -> FourMomentum {
        self + *rhs
    }
}

impl Sum for FourMomentum {
    fn sum<I: Iterator<Item = FourMomentum>>(iter: I) -> Self {
        iter.fold(FourMomentum::default(), Add::add)
    }
}

impl<'a> Sum<&'a FourMomentum> for FourMomentum {
    fn sum<I: Iterator<Item = &'a FourMomentum>>(iter: I) -> Self {
        iter.fold(FourMomentum::default(), |acc, p| acc + p)
    }
}
