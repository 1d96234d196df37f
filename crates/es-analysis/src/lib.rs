//! # es-analysis
//!
//! Event-level orchestration for evsel: per-event inputs, systematic
//! variations, the concrete selections, and the parallel event loop.
//!
//! Each event is run once per [`Variation`](es_core::Variation). The
//! [`VariationDriver`] hands the analysis a fresh corrected copy of the
//! event's objects and a histogram scope that namespaces every fill under the
//! variation name.
//!
//! ```no_run
//! use es_analysis::{EventRecord, RunCard, run_events};
//!
//! # fn main() -> es_core::Result<()> {
//! let card = RunCard::from_path(std::path::Path::new("run.yaml"))?;
//! let events: Vec<EventRecord> = Vec::new();
//! let out = run_events(&card, &events)?;
//! println!("{} histograms", out.histograms.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analyses;
pub mod config;
pub mod corrections;
pub mod cutflow;
pub mod driver;
pub mod provider;
pub mod runner;

pub use analyses::{DrellYan, DyCuts, LrsmCuts, LrsmTb, Ttbar, TtbarCuts};
pub use config::{AnalysisKind, CutOverrides, Flags, RunCard};
pub use corrections::EventObjects;
pub use cutflow::CutFlow;
pub use driver::{Analysis, Outcome, VariationContext, VariationDriver, VariationScope};
pub use provider::{EventRecord, EventView, MetProvider, ObjectProvider, RunWeights, WeightProvider};
pub use runner::{RunOutput, run_events, run_with};

/// es-analysis version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
