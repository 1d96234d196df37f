//! Event loop: drive one analysis over many events in parallel.
//!
//! Every worker fills a private [`HistogramSet`] and [`CutFlow`]; partial
//! results are merged pairwise, so the result does not depend on how rayon
//! splits the input (up to floating-point summation order). With one thread
//! the events are processed sequentially in input order.

use std::collections::BTreeMap;

use es_core::{Error, Result, VariationSet};
use es_hist::HistogramSet;
use rayon::prelude::*;
use serde::Serialize;

use crate::config::RunCard;
use crate::cutflow::CutFlow;
use crate::driver::{Analysis, VariationDriver};
use crate::provider::{EventView, WeightProvider};

/// Merged result of one run.
#[derive(Debug, Clone, Serialize)]
pub struct RunOutput {
    /// Analysis name.
    pub analysis: String,
    /// Executed variations, in order.
    pub variations: Vec<String>,
    /// Events processed.
    pub n_events: u64,
    /// Events accepted per variation.
    pub accepted: BTreeMap<String, u64>,
    /// Unweighted stage counts.
    pub cutflow: CutFlow,
    /// Every filled histogram, keyed `"<variation>/<name>"`.
    pub histograms: HistogramSet,
}

struct Accumulator {
    histograms: HistogramSet,
    cutflow: CutFlow,
    n_events: u64,
    accepted: Vec<u64>,
}

impl Accumulator {
    fn new(stages: &[&str], n_variations: usize) -> Self {
        Self {
            histograms: HistogramSet::new(),
            cutflow: CutFlow::new(stages),
            n_events: 0,
            accepted: vec![0; n_variations],
        }
    }

    fn process<E: EventView>(&mut self, driver: &VariationDriver<'_>, event: &E) {
        let outcomes = driver.process(event, &mut self.histograms, &mut self.cutflow);
        self.n_events += 1;
        for (count, outcome) in self.accepted.iter_mut().zip(&outcomes) {
            if outcome.is_accepted() {
                *count += 1;
            }
        }
    }

    fn merge(&mut self, other: Accumulator) {
        self.histograms.merge(other.histograms);
        self.cutflow.merge(&other.cutflow);
        self.n_events += other.n_events;
        for (a, b) in self.accepted.iter_mut().zip(other.accepted) {
            *a += b;
        }
    }
}

/// Run the analysis configured in `card` over `events`.
pub fn run_events<E>(card: &RunCard, events: &[E]) -> Result<RunOutput>
where
    E: EventView + Sync,
{
    let analysis = card.build_analysis();
    let variations = card.effective_variations();
    let weights = card.weights();
    run_with(analysis.as_ref(), &variations, &weights, card.threads, events)
}

/// Run `analysis` under `variations` over `events` on `threads` workers
/// (0 = rayon's global pool).
pub fn run_with<E>(
    analysis: &dyn Analysis,
    variations: &VariationSet,
    weights: &dyn WeightProvider,
    threads: usize,
    events: &[E],
) -> Result<RunOutput>
where
    E: EventView + Sync,
{
    tracing::info!(
        analysis = analysis.name(),
        n_events = events.len(),
        n_variations = variations.len(),
        threads,
        "processing events"
    );

    let driver = VariationDriver::new(analysis, variations, weights);
    let stages = analysis.stages();
    let n_var = variations.len();

    let run_parallel = || {
        events
            .par_iter()
            .fold(
                || Accumulator::new(stages, n_var),
                |mut acc, event| {
                    acc.process(&driver, event);
                    acc
                },
            )
            .reduce(
                || Accumulator::new(stages, n_var),
                |mut a, b| {
                    a.merge(b);
                    a
                },
            )
    };

    let total = match threads {
        0 => run_parallel(),
        1 => events.iter().fold(Accumulator::new(stages, n_var), |mut acc, event| {
            acc.process(&driver, event);
            acc
        }),
        n => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| Error::Computation(format!("failed to create thread pool: {e}")))?;
            pool.install(run_parallel)
        }
    };

    let names = variations.names();
    let accepted: BTreeMap<String, u64> =
        names.iter().map(|n| n.to_string()).zip(total.accepted.iter().copied()).collect();
    tracing::info!(
        n_events = total.n_events,
        accepted_nominal = accepted.get(variations.nominal().name.as_str()).copied().unwrap_or(0),
        n_histograms = total.histograms.len(),
        "run complete"
    );

    Ok(RunOutput {
        analysis: analysis.name().to_string(),
        variations: names.into_iter().map(str::to_string).collect(),
        n_events: total.n_events,
        accepted,
        cutflow: total.cutflow,
        histograms: total.histograms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::EventRecord;
    use es_physics::{FourMomentum, Lepton, LeptonIdFlags};

    fn dy_event(pt1: f64, pt2: f64, gen_weight: f64) -> EventRecord {
        let tight = LeptonIdFlags { tight: true, ..Default::default() };
        EventRecord {
            gen_weight,
            muons: vec![
                Lepton::muon(FourMomentum::from_pt_eta_phi_m(pt1, 0.1, 0.0, 0.105), -1).with_id(tight),
                Lepton::muon(FourMomentum::from_pt_eta_phi_m(pt2, -0.4, 2.8, 0.105), 1).with_id(tight),
            ],
            triggers: ["HLT_IsoMu24".to_string()].into_iter().collect(),
            ..Default::default()
        }
    }

    fn card(threads: usize) -> RunCard {
        let mut card: RunCard = serde_json::from_str(
            r#"{"analysis": "dy", "era": "2018", "luminosity": 2.0,
                "flags": {"run_syst": true},
                "variations": [{"name": "Central"}, {"name": "MuonScaleDown", "muon_momentum_scale": 0.5}]}"#,
        )
        .unwrap();
        card.threads = threads;
        card
    }

    fn events() -> Vec<EventRecord> {
        (0..200).map(|i| dy_event(40.0 + (i % 50) as f64, 30.0 + (i % 7) as f64, 1.0 + (i % 3) as f64)).collect()
    }

    #[test]
    fn sequential_run_counts_everything() {
        let out = run_events(&card(1), &events()).unwrap();
        assert_eq!(out.n_events, 200);
        assert_eq!(out.accepted["Central"], 200);
        // halved muon momenta fall below the 26 GeV threshold for the subleading muon
        assert_eq!(out.accepted["MuonScaleDown"], 0);
        assert_eq!(out.cutflow.count("Central", 3), 200);
        assert_eq!(out.cutflow.count("MuonScaleDown", 1), 200);
        let total_w: f64 = events().iter().map(|e| e.gen_weight * 2.0).sum();
        let mll = out.histograms.get("Central/DileptonMass").unwrap();
        assert!((mll.integral() - total_w).abs() < 1e-9);
    }

    #[test]
    fn parallel_matches_sequential() {
        let evs = events();
        let seq = run_events(&card(1), &evs).unwrap();
        for threads in [0, 4] {
            let par = run_events(&card(threads), &evs).unwrap();
            assert_eq!(par.n_events, seq.n_events);
            assert_eq!(par.accepted, seq.accepted);
            assert_eq!(par.cutflow, seq.cutflow);
            assert!(par.histograms.names().eq(seq.histograms.names()));
            for (name, h) in seq.histograms.iter() {
                let p = par.histograms.get(name).unwrap();
                assert_eq!(p.entries(), h.entries(), "{name}");
                assert!((p.integral() - h.integral()).abs() < 1e-9, "{name}");
            }
        }
    }

    #[test]
    fn empty_input() {
        let out = run_events::<EventRecord>(&card(1), &[]).unwrap();
        assert_eq!(out.n_events, 0);
        assert!(out.histograms.is_empty());
        assert_eq!(out.variations, vec!["Central", "MuonScaleDown"]);
    }
}
