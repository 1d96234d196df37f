//! `evsel run` and `evsel validate`.

use anyhow::{Context, Result};
use es_analysis::{EventRecord, RunCard, run_events};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use crate::write_json;

pub fn cmd_run(
    config: &Path,
    events: &Path,
    output: Option<&PathBuf>,
    threads: Option<usize>,
) -> Result<()> {
    let mut card = load_card(config)?;
    if let Some(n) = threads {
        card.threads = n;
    }

    tracing::info!(path = %events.display(), "reading events");
    let records = read_events(events)?;
    tracing::info!(n_events = records.len(), "events loaded");

    let out = run_events(&card, &records)?;

    let output_json = serde_json::json!({
        "analysis": out.analysis,
        "era": card.era,
        "is_data": card.is_data,
        "luminosity": card.luminosity,
        "variations": out.variations,
        "n_events": out.n_events,
        "accepted": out.accepted,
        "cutflow": out.cutflow,
        "histograms": out.histograms,
        "evsel_version": es_core::VERSION,
    });

    write_json(output, output_json)
}

pub fn cmd_validate(config: &Path, output: Option<&PathBuf>) -> Result<()> {
    let card = load_card(config)?;
    let analysis = card.build_analysis();
    let variations = card.effective_variations();

    let output_json = serde_json::json!({
        "analysis": analysis.name(),
        "era": card.era,
        "is_data": card.is_data,
        "threads": card.threads,
        "stages": analysis.stages(),
        "variations": variations.names(),
        "card": card,
    });

    write_json(output, output_json)
}

fn load_card(path: &Path) -> Result<RunCard> {
    tracing::info!(path = %path.display(), "loading run card");
    let card = RunCard::from_path(path)
        .with_context(|| format!("invalid run card: {}", path.display()))?;
    tracing::info!(analysis = card.analysis.as_str(), era = %card.era, "run card loaded");
    Ok(card)
}

fn read_events(path: &Path) -> Result<Vec<EventRecord>> {
    let reader: Box<dyn Read> = if path.as_os_str() == "-" {
        Box::new(std::io::stdin().lock())
    } else {
        let file = std::fs::File::open(path)
            .with_context(|| format!("cannot open event file: {}", path.display()))?;
        Box::new(file)
    };

    let stream = serde_json::Deserializer::from_reader(BufReader::new(reader)).into_iter::<EventRecord>();
    let mut records = Vec::new();
    for (i, record) in stream.enumerate() {
        let record = record.with_context(|| format!("{}: malformed event #{i}", path.display()))?;
        records.push(record);
    }
    Ok(records)
}
