//! Reconstructed physics objects: leptons, jets, and fat jets.
//!
//! Objects are plain values owned by the collection that holds them. The
//! capability set is expressed as traits: every object is [`Kinematic`];
//! leptons are additionally [`Charged`] and carry a vertex [`FitQuality`].

use es_core::Result;
use serde::{Deserialize, Serialize};

use crate::four_momentum::FourMomentum;
use crate::tagging::{FatJetScores, FatJetTagger, FlavorScores, JetFlavTagger, TagTarget, TaggerKey};

/// Anything with a four-momentum.
pub trait Kinematic {
    /// The (already corrected) four-momentum.
    fn p4(&self) -> &FourMomentum;

    /// Transverse momentum.
    fn pt(&self) -> f64 {
        self.p4().pt()
    }

    /// Pseudorapidity.
    fn eta(&self) -> f64 {
        self.p4().eta()
    }

    /// Azimuth.
    fn phi(&self) -> f64 {
        self.p4().phi()
    }

    /// Angular distance to another object.
    fn delta_r<K: Kinematic + ?Sized>(&self, other: &K) -> f64 {
        self.p4().delta_r(other.p4())
    }
}

impl Kinematic for FourMomentum {
    fn p4(&self) -> &FourMomentum {
        self
    }
}

/// Objects with an electric charge.
pub trait Charged {
    /// Charge in units of e.
    fn charge(&self) -> i32;
}

/// Objects with a vertex-fit goodness-of-fit (lower is better).
pub trait FitQuality {
    /// Fit χ².
    fn fit_chi2(&self) -> f64;
}

/// Identification predicate evaluated against one object type.
pub trait Identify<Id> {
    /// `true` if the object passes `id`.
    fn passes_id(&self, id: Id) -> bool;

    /// `true` if the object passes every id in `ids` (AND).
    fn passes_all(&self, ids: &[Id]) -> bool
    where
        Id: Copy,
    {
        ids.iter().all(|&id| self.passes_id(id))
    }
}

/// Lepton flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeptonFlavor {
    /// Electron
    Electron,
    /// Muon
    #[default]
    Muon,
}

/// Identification working-point flags as stored per lepton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LeptonIdFlags {
    /// POG loose ID.
    #[serde(default)]
    pub loose: bool,
    /// POG medium ID.
    #[serde(default)]
    pub medium: bool,
    /// POG tight ID.
    #[serde(default)]
    pub tight: bool,
    /// High-pT ID level: 0 none, 1 tracker high-pT, 2 global high-pT.
    #[serde(default)]
    pub high_pt_id: u8,
    /// Tracker isolation level: 0 none, 1 loose, 2 tight.
    #[serde(default)]
    pub tk_iso_id: u8,
}

/// Named lepton identification criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeptonId {
    /// Always passes.
    NoCut,
    /// POG loose.
    PogLoose,
    /// POG medium.
    PogMedium,
    /// POG tight.
    PogTight,
    /// Tracker high-pT ID.
    PogTrackerHighPt,
    /// Global high-pT ID.
    PogGlobalHighPt,
    /// Tracker isolation, loose.
    PogTkIsoLoose,
    /// Tracker isolation, tight.
    PogTkIsoTight,
}

/// Reconstructed lepton.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lepton {
    /// Four-momentum.
    #[serde(flatten)]
    pub p4: FourMomentum,
    /// Flavour.
    #[serde(default)]
    pub flavor: LeptonFlavor,
    /// Electric charge (±1).
    pub charge: i32,
    /// Identification flags.
    #[serde(default)]
    pub id: LeptonIdFlags,
    /// Beam-spot-constrained vertex fit χ².
    #[serde(default)]
    pub bs_chi2: f64,
}

impl Lepton {
    /// Muon with the given kinematics and charge, no ID flags set.
    pub fn muon(p4: FourMomentum, charge: i32) -> Self {
        Self { p4, flavor: LeptonFlavor::Muon, charge, id: LeptonIdFlags::default(), bs_chi2: 0.0 }
    }

    /// Builder: set the identification flags.
    pub fn with_id(mut self, id: LeptonIdFlags) -> Self {
        self.id = id;
        self
    }

    /// Builder: set the vertex-fit χ².
    pub fn with_bs_chi2(mut self, chi2: f64) -> Self {
        self.bs_chi2 = chi2;
        self
    }

    /// Copy with the four-momentum replaced.
    pub fn with_p4(&self, p4: FourMomentum) -> Self {
        Self { p4, ..self.clone() }
    }
}

impl Kinematic for Lepton {
    fn p4(&self) -> &FourMomentum {
        &self.p4
    }
}

impl Charged for Lepton {
    fn charge(&self) -> i32 {
        self.charge
    }
}

impl FitQuality for Lepton {
    fn fit_chi2(&self) -> f64 {
        self.bs_chi2
    }
}

impl Identify<LeptonId> for Lepton {
    fn passes_id(&self, id: LeptonId) -> bool {
        let f = &self.id;
        match id {
            LeptonId::NoCut => true,
            LeptonId::PogLoose => f.loose,
            LeptonId::PogMedium => f.medium,
            LeptonId::PogTight => f.tight,
            LeptonId::PogTrackerHighPt => f.high_pt_id == 1,
            LeptonId::PogGlobalHighPt => f.high_pt_id == 2,
            LeptonId::PogTkIsoLoose => f.tk_iso_id >= 1,
            LeptonId::PogTkIsoTight => f.tk_iso_id == 2,
        }
    }
}

/// Jet identification criteria, decoded from the jet ID bit field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JetId {
    /// Always passes.
    NoCut,
    /// Tight (bit 2).
    Tight,
    /// Tight with lepton veto (bit 3).
    TightLepVeto,
}

impl JetId {
    fn passes(self, bits: u8) -> bool {
        match self {
            JetId::NoCut => true,
            JetId::Tight => bits & 0b010 != 0,
            JetId::TightLepVeto => bits & 0b100 != 0,
        }
    }
}

/// Small-radius (AK4) jet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Jet {
    /// Four-momentum.
    #[serde(flatten)]
    pub p4: FourMomentum,
    /// b-tag discriminants.
    #[serde(default)]
    pub btag: FlavorScores,
    /// Jet ID bit field.
    #[serde(default)]
    pub jet_id: u8,
}

impl Jet {
    /// Jet with the given kinematics and no tag information.
    pub fn new(p4: FourMomentum) -> Self {
        Self { p4, btag: FlavorScores::default(), jet_id: 0 }
    }

    /// Builder: set the b-tag scores.
    pub fn with_btag(mut self, btag: FlavorScores) -> Self {
        self.btag = btag;
        self
    }

    /// Builder: set the jet ID bits.
    pub fn with_jet_id(mut self, bits: u8) -> Self {
        self.jet_id = bits;
        self
    }

    /// Copy with the four-momentum replaced.
    pub fn with_p4(&self, p4: FourMomentum) -> Self {
        Self { p4, ..self.clone() }
    }

    /// b-tag score of the given tagger.
    pub fn btag_score(&self, tagger: JetFlavTagger) -> f64 {
        self.btag.score(tagger)
    }
}

impl Kinematic for Jet {
    fn p4(&self) -> &FourMomentum {
        &self.p4
    }
}

impl Identify<JetId> for Jet {
    fn passes_id(&self, id: JetId) -> bool {
        id.passes(self.jet_id)
    }
}

/// Large-radius (AK8) jet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FatJet {
    /// Four-momentum.
    #[serde(flatten)]
    pub p4: FourMomentum,
    /// Soft-drop groomed mass.
    #[serde(default)]
    pub sd_mass: f64,
    /// Jet ID bit field.
    #[serde(default)]
    pub jet_id: u8,
    /// Substructure tagger outputs.
    #[serde(default)]
    pub scores: FatJetScores,
}

impl FatJet {
    /// Fat jet with the given kinematics and soft-drop mass.
    pub fn new(p4: FourMomentum, sd_mass: f64) -> Self {
        Self { p4, sd_mass, jet_id: 0, scores: FatJetScores::new() }
    }

    /// Builder: store one tagger output.
    pub fn with_score(mut self, tagger: FatJetTagger, target: TagTarget, score: f64) -> Result<Self> {
        self.scores.insert(TaggerKey::new(tagger, target)?, score);
        Ok(self)
    }

    /// Copy with the four-momentum replaced.
    ///
    /// The soft-drop mass scales with the same factor as the jet energy.
    pub fn with_p4(&self, p4: FourMomentum) -> Self {
        let factor = if self.p4.e() > 0.0 { p4.e() / self.p4.e() } else { 1.0 };
        Self { p4, sd_mass: self.sd_mass * factor, ..self.clone() }
    }

    /// Soft-drop mass.
    pub fn sd_mass(&self) -> f64 {
        self.sd_mass
    }

    /// Tagger output for `(tagger, target)`.
    ///
    /// Unsupported pairs, and supported pairs without a stored value, are
    /// [`es_core::Error::NotFound`].
    pub fn tagger_score(&self, tagger: FatJetTagger, target: TagTarget) -> Result<f64> {
        let key = TaggerKey::new(tagger, target)?;
        self.scores
            .get(&key)
            .copied()
            .ok_or_else(|| es_core::Error::NotFound(format!("fat jet has no stored {key} score")))
    }
}

impl Kinematic for FatJet {
    fn p4(&self) -> &FourMomentum {
        &self.p4
    }
}

impl Identify<JetId> for FatJet {
    fn passes_id(&self, id: JetId) -> bool {
        id.passes(self.jet_id)
    }
}
