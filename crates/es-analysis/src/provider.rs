//! Per-event inputs: object collections, MET, trigger bits, and weights.

use std::collections::{BTreeMap, BTreeSet};

use es_core::{TriggerDecision, Variation};
use es_physics::{FatJet, Jet, Lepton, Met};
use serde::{Deserialize, Serialize};

/// Already-corrected object collections of one event.
pub trait ObjectProvider {
    /// Muons in reconstruction order.
    fn muons(&self) -> &[Lepton];
    /// Small-radius jets in reconstruction order.
    fn jets(&self) -> &[Jet];
    /// Large-radius jets in reconstruction order.
    fn fatjets(&self) -> &[FatJet];
}

/// Missing transverse momentum per variation.
pub trait MetProvider {
    /// MET under the named variation. Variations without a dedicated value
    /// use the nominal one.
    fn met(&self, variation: &str) -> Met;
}

/// Multiplicative weights supplied from outside the selection logic.
pub trait WeightProvider: Sync {
    /// Per-event factor for the given generator weight and variation.
    fn event_weight(&self, gen_weight: f64, variation: &Variation) -> f64;

    /// Scale factor for one selected lepton.
    fn lepton_sf(&self, lepton: &Lepton, variation: &Variation) -> f64;
}

/// Everything the variation driver needs from one event.
pub trait EventView: ObjectProvider + MetProvider + TriggerDecision {
    /// Generator-level event weight (1 for collision data).
    fn gen_weight(&self) -> f64;
}

/// One event as read from the input stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Run number.
    #[serde(default)]
    pub run: u64,
    /// Event number.
    #[serde(default)]
    pub event: u64,
    /// Generator weight.
    #[serde(default = "unit")]
    pub gen_weight: f64,
    /// Muons.
    #[serde(default)]
    pub muons: Vec<Lepton>,
    /// AK4 jets.
    #[serde(default)]
    pub jets: Vec<Jet>,
    /// AK8 jets.
    #[serde(default)]
    pub fatjets: Vec<FatJet>,
    /// Nominal MET.
    #[serde(default)]
    pub met: Met,
    /// MET recomputed under named variations.
    #[serde(default)]
    pub met_variations: BTreeMap<String, Met>,
    /// Trigger paths that fired.
    #[serde(default)]
    pub triggers: BTreeSet<String>,
}

fn unit() -> f64 {
    1.0
}

impl Default for EventRecord {
    fn default() -> Self {
        Self {
            run: 0,
            event: 0,
            gen_weight: unit(),
            muons: Vec::new(),
            jets: Vec::new(),
            fatjets: Vec::new(),
            met: Met::default(),
            met_variations: BTreeMap::new(),
            triggers: BTreeSet::new(),
        }
    }
}

impl ObjectProvider for EventRecord {
    fn muons(&self) -> &[Lepton] {
        &self.muons
    }

    fn jets(&self) -> &[Jet] {
        &self.jets
    }

    fn fatjets(&self) -> &[FatJet] {
        &self.fatjets
    }
}

impl MetProvider for EventRecord {
    fn met(&self, variation: &str) -> Met {
        self.met_variations.get(variation).copied().unwrap_or(self.met)
    }
}

impl TriggerDecision for EventRecord {
    fn passes_trigger(&self, path: &str) -> bool {
        self.triggers.contains(path)
    }
}

impl EventView for EventRecord {
    fn gen_weight(&self) -> f64 {
        self.gen_weight
    }
}

/// Run-level weights: unit for data, `gen × luminosity × scales` for simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunWeights {
    /// Collision data (all weights are 1).
    pub is_data: bool,
    /// Normalisation applied to every simulated event.
    pub luminosity: f64,
}

impl WeightProvider for RunWeights {
    fn event_weight(&self, gen_weight: f64, variation: &Variation) -> f64 {
        if self.is_data {
            1.0
        } else {
            gen_weight * self.luminosity * variation.event_weight_scale
        }
    }

    fn lepton_sf(&self, _lepton: &Lepton, variation: &Variation) -> f64 {
        if self.is_data { 1.0 } else { variation.lepton_sf }
    }
}
