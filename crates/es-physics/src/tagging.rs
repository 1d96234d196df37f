//! Flavour and substructure tagger identifiers.
//!
//! Fat-jet tagger outputs are addressed by a `(tagger, target)` pair. Only the
//! pairs listed in [`SUPPORTED_FATJET_SCORES`] exist; anything else is a
//! lookup error rather than a magic negative score.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use es_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Small-radius jet flavour tagger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JetFlavTagger {
    /// DeepJet (DeepFlavour).
    DeepJet,
    /// ParticleNet AK4.
    ParticleNet,
    /// Robust Particle Transformer.
    ParT,
}

/// Per-jet b-tag discriminants, one per tagger, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FlavorScores {
    /// DeepJet b vs. all.
    #[serde(default)]
    pub deep_jet: f64,
    /// ParticleNet b vs. all.
    #[serde(default)]
    pub particle_net: f64,
    /// ParT b vs. all.
    #[serde(default)]
    pub par_t: f64,
}

impl FlavorScores {
    /// Score of the requested tagger.
    pub fn score(&self, tagger: JetFlavTagger) -> f64 {
        match tagger {
            JetFlavTagger::DeepJet => self.deep_jet,
            JetFlavTagger::ParticleNet => self.particle_net,
            JetFlavTagger::ParT => self.par_t,
        }
    }
}

/// Large-radius jet tagger family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FatJetTagger {
    /// DeepDoubleX (mass-decorrelated) discriminators.
    DeepDoubleX,
    /// DeepCSV subjet b tag.
    DeepCsv,
    /// Legacy double-b tagger.
    HiggsToBb,
    /// ParticleNet without the mass input.
    ParticleNet,
    /// ParticleNet with the mass input.
    ParticleNetWithMass,
}

/// Hypothesis a fat-jet tagger output discriminates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TagTarget {
    /// H→4q vs. QCD.
    H4qVsQcd,
    /// H→cc vs. QCD.
    HccVsQcd,
    /// H→bb vs. QCD.
    HbbVsQcd,
    /// H→cc vs. H→bb.
    HccVsHbb,
    /// b+bb vs. light.
    BVsAll,
    /// QCD probability sum.
    Qcd,
    /// QCD with no heavy-flavour hadrons.
    Qcd0Hf,
    /// QCD with one heavy-flavour hadron.
    Qcd1Hf,
    /// QCD with two heavy-flavour hadrons.
    Qcd2Hf,
    /// top vs. QCD.
    TVsQcd,
    /// W vs. QCD.
    WVsQcd,
    /// Z vs. QCD.
    ZVsQcd,
    /// X→bb vs. QCD.
    XbbVsQcd,
    /// X→cc vs. QCD.
    XccVsQcd,
    /// X→qq (uds) vs. QCD.
    XqqVsQcd,
    /// X→gg vs. QCD.
    XggVsQcd,
    /// X→e τh vs. QCD.
    XteVsQcd,
    /// X→μ τh vs. QCD.
    XtmVsQcd,
    /// X→τh τh vs. QCD.
    XttVsQcd,
    /// Mass regression (relative correction).
    MassCorr,
}

use FatJetTagger as T;
use TagTarget as O;

/// Every `(tagger, target)` pair that has a stored score.
pub const SUPPORTED_FATJET_SCORES: &[(FatJetTagger, TagTarget)] = &[
    (T::DeepDoubleX, O::HbbVsQcd),
    (T::DeepDoubleX, O::HccVsQcd),
    (T::DeepDoubleX, O::HccVsHbb),
    (T::DeepCsv, O::BVsAll),
    (T::HiggsToBb, O::HbbVsQcd),
    (T::ParticleNet, O::Qcd),
    (T::ParticleNet, O::Qcd0Hf),
    (T::ParticleNet, O::Qcd1Hf),
    (T::ParticleNet, O::Qcd2Hf),
    (T::ParticleNet, O::XbbVsQcd),
    (T::ParticleNet, O::XccVsQcd),
    (T::ParticleNet, O::XqqVsQcd),
    (T::ParticleNet, O::XggVsQcd),
    (T::ParticleNet, O::XteVsQcd),
    (T::ParticleNet, O::XtmVsQcd),
    (T::ParticleNet, O::XttVsQcd),
    (T::ParticleNet, O::MassCorr),
    (T::ParticleNetWithMass, O::H4qVsQcd),
    (T::ParticleNetWithMass, O::HccVsQcd),
    (T::ParticleNetWithMass, O::HbbVsQcd),
    (T::ParticleNetWithMass, O::Qcd),
    (T::ParticleNetWithMass, O::TVsQcd),
    (T::ParticleNetWithMass, O::WVsQcd),
    (T::ParticleNetWithMass, O::ZVsQcd),
];

/// Validated `(tagger, target)` key.
///
/// Written as `"Tagger:Target"` in serialised score maps, e.g.
/// `"ParticleNetWithMass:TVsQcd"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaggerKey {
    tagger: FatJetTagger,
    target: TagTarget,
}

impl TaggerKey {
    /// Look the pair up in the supported table.
    pub fn new(tagger: FatJetTagger, target: TagTarget) -> Result<Self> {
        if SUPPORTED_FATJET_SCORES.contains(&(tagger, target)) {
            Ok(Self { tagger, target })
        } else {
            Err(Error::NotFound(format!("no {tagger:?} output for target {target:?}")))
        }
    }
}

impl fmt::Display for TaggerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}:{:?}", self.tagger, self.target)
    }
}

impl FromStr for TaggerKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        SUPPORTED_FATJET_SCORES
            .iter()
            .map(|&(tagger, target)| TaggerKey { tagger, target })
            .find(|k| k.to_string() == s)
            .ok_or_else(|| Error::NotFound(format!("unknown fat-jet tagger output '{s}'")))
    }
}

impl TryFrom<String> for TaggerKey {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<TaggerKey> for String {
    fn from(k: TaggerKey) -> Self {
        k.to_string()
    }
}

/// Stored fat-jet tagger outputs.
pub type FatJetScores = BTreeMap<TaggerKey, f64>;
