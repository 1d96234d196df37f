//! Collaborator traits for evsel
//!
//! The selection pipeline consumes its surroundings through these narrow
//! interfaces: where histograms go, which trigger paths fired, and which
//! variations to run. Implementations live outside this crate.

use crate::types::{Binning, Variation, VariationSet};

/// Destination for weighted observables.
///
/// Fire-and-forget: the pipeline never reads anything back.
pub trait HistogramSink {
    /// Record `value` with `weight` in the histogram `name`, creating it with
    /// `binning` on first use.
    fn fill(&mut self, name: &str, value: f64, weight: f64, binning: Binning);
}

impl<S: HistogramSink + ?Sized> HistogramSink for &mut S {
    fn fill(&mut self, name: &str, value: f64, weight: f64, binning: Binning) {
        (**self).fill(name, value, weight, binning)
    }
}

/// Pass/fail decision for named trigger paths of one event.
pub trait TriggerDecision {
    /// `true` if the trigger path fired.
    fn passes_trigger(&self, path: &str) -> bool;
}

/// Finite, ordered source of variations, nominal first.
pub trait VariationSource {
    /// Variations in execution order.
    fn variations(&self) -> &[Variation];
}

impl VariationSource for VariationSet {
    fn variations(&self) -> &[Variation] {
        self.iter().as_slice()
    }
}

impl VariationSource for [Variation] {
    fn variations(&self) -> &[Variation] {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountingSink {
        fills: Vec<(String, f64, f64)>,
    }

    impl HistogramSink for CountingSink {
        fn fill(&mut self, name: &str, value: f64, weight: f64, _binning: Binning) {
            self.fills.push((name.to_string(), value, weight));
        }
    }

    struct Fired(&'static [&'static str]);

    impl TriggerDecision for Fired {
        fn passes_trigger(&self, path: &str) -> bool {
            self.0.contains(&path)
        }
    }

    fn fill_once<S: HistogramSink>(mut sink: S) {
        sink.fill("h", 1.0, 2.0, Binning::uniform(1, 0.0, 2.0));
    }

    #[test]
    fn test_sink_through_mut_ref() {
        let mut sink = CountingSink { fills: Vec::new() };
        fill_once(&mut sink);
        fill_once(&mut sink);
        assert_eq!(sink.fills.len(), 2);
        assert_eq!(sink.fills[0], ("h".to_string(), 1.0, 2.0));
    }

    #[test]
    fn test_trigger_by_name() {
        let ev = Fired(&["HLT_Mu50"]);
        assert!(ev.passes_trigger("HLT_Mu50"));
        assert!(!ev.passes_trigger("HLT_IsoMu24"));
    }

    #[test]
    fn test_variation_source_order() {
        let set = VariationSet::new(vec![Variation::nominal(), Variation::named("JetEnUp")])
            .unwrap();
        let names: Vec<&str> = set.variations().iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["Central", "JetEnUp"]);
    }
}
