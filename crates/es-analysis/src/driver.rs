//! Per-event re-execution of an analysis under every variation.
//!
//! Variations run strictly one after another. Each gets its own corrected
//! object copies, MET, and a histogram scope that prefixes every name with
//! `"<variation>/"`. A rejected variation only ends that variation.

use es_core::{HistogramSink, TriggerDecision, Variation, VariationSource};
use es_physics::{Lepton, Met};

use crate::corrections::EventObjects;
use crate::cutflow::{CUTFLOW_BINNING, CUTFLOW_HISTOGRAM, CutFlow};
use crate::provider::{EventView, WeightProvider};

/// Result of running one variation of one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every cut passed and the observables were filled.
    Accepted,
    /// Processing stopped at the named cut.
    Rejected {
        /// Label of the failed cut.
        cut: &'static str,
    },
}

impl Outcome {
    /// `true` for [`Outcome::Accepted`].
    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted)
    }
}

/// Inputs of one variation of one event.
pub struct VariationContext<'a> {
    /// Active variation.
    pub variation: &'a Variation,
    /// Objects corrected for this variation.
    pub objects: EventObjects,
    /// MET for this variation.
    pub met: Met,
    gen_weight: f64,
    triggers: &'a dyn TriggerDecision,
    weights: &'a dyn WeightProvider,
}

impl<'a> VariationContext<'a> {
    /// Assemble a context from its parts.
    pub fn new(
        variation: &'a Variation,
        objects: EventObjects,
        met: Met,
        gen_weight: f64,
        triggers: &'a dyn TriggerDecision,
        weights: &'a dyn WeightProvider,
    ) -> Self {
        Self { variation, objects, met, gen_weight, triggers, weights }
    }

    /// `true` if any of `paths` fired.
    pub fn fired_any<S: AsRef<str>>(&self, paths: &[S]) -> bool {
        paths.iter().any(|p| self.triggers.passes_trigger(p.as_ref()))
    }

    /// Event weight with the scale factors of `leptons` folded in.
    pub fn event_weight<'l, I>(&self, leptons: I) -> f64
    where
        I: IntoIterator<Item = &'l Lepton>,
    {
        let base = self.weights.event_weight(self.gen_weight, self.variation);
        leptons.into_iter().fold(base, |w, l| w * self.weights.lepton_sf(l, self.variation))
    }
}

/// Histogram sink scoped to one variation, plus cut-flow recording.
pub struct VariationScope<'a> {
    variation: &'a str,
    sink: &'a mut dyn HistogramSink,
    cutflow: &'a mut CutFlow,
}

impl<'a> VariationScope<'a> {
    /// Scope `sink` and `cutflow` to `variation`.
    pub fn new(variation: &'a str, sink: &'a mut dyn HistogramSink, cutflow: &'a mut CutFlow) -> Self {
        Self { variation, sink, cutflow }
    }

    /// Mark selection stage `stage` as passed.
    pub fn pass(&mut self, stage: usize) {
        self.fill(CUTFLOW_HISTOGRAM, stage as f64, 1.0, CUTFLOW_BINNING);
        self.cutflow.record(self.variation, stage);
    }
}

impl HistogramSink for VariationScope<'_> {
    fn fill(&mut self, name: &str, value: f64, weight: f64, binning: es_core::Binning) {
        let full = format!("{}/{name}", self.variation);
        self.sink.fill(&full, value, weight, binning);
    }
}

/// One event-selection analysis.
///
/// Implementations hold configuration only; all per-event state lives in the
/// [`VariationContext`] they are handed.
pub trait Analysis: Send + Sync {
    /// Short identifier.
    fn name(&self) -> &'static str;

    /// Cut-flow stage labels, indexed by the stage numbers passed to
    /// [`VariationScope::pass`].
    fn stages(&self) -> &'static [&'static str];

    /// Run the selection for one variation.
    fn execute(&self, ctx: &VariationContext<'_>, out: &mut VariationScope<'_>) -> Outcome;
}

/// Runs an [`Analysis`] once per variation for each event.
pub struct VariationDriver<'a> {
    analysis: &'a dyn Analysis,
    variations: &'a [Variation],
    weights: &'a dyn WeightProvider,
}

impl<'a> VariationDriver<'a> {
    /// Driver over the variations of `source`, in order.
    pub fn new<V>(analysis: &'a dyn Analysis, source: &'a V, weights: &'a dyn WeightProvider) -> Self
    where
        V: VariationSource + ?Sized,
    {
        Self { analysis, variations: source.variations(), weights }
    }

    /// Process one event. Returns one outcome per variation, in order.
    pub fn process<E: EventView>(
        &self,
        event: &E,
        sink: &mut dyn HistogramSink,
        cutflow: &mut CutFlow,
    ) -> Vec<Outcome> {
        let objects = EventObjects::fetch(event);
        let mut outcomes = Vec::with_capacity(self.variations.len());
        for variation in self.variations {
            let ctx = VariationContext::new(
                variation,
                objects.corrected(variation),
                event.met(&variation.name),
                event.gen_weight(),
                event,
                self.weights,
            );
            let mut scope = VariationScope::new(&variation.name, &mut *sink, &mut *cutflow);
            let outcome = self.analysis.execute(&ctx, &mut scope);
            if let Outcome::Rejected { cut } = outcome {
                tracing::debug!(
                    analysis = self.analysis.name(),
                    variation = %variation.name,
                    cut,
                    "variation rejected"
                );
            }
            outcomes.push(outcome);
        }
        outcomes
    }
}
