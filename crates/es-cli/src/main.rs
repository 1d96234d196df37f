//! evsel CLI

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod run;

#[derive(Parser)]
#[command(name = "evsel")]
#[command(about = "evsel - event selection and histogramming for collider analyses")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an analysis over an event file
    Run {
        /// Run card (YAML, or JSON with a `.json` extension)
        #[arg(short, long)]
        config: PathBuf,

        /// Events as JSON Lines or concatenated JSON objects (`-` for stdin)
        #[arg(short, long)]
        events: PathBuf,

        /// Output file for results (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Threads (0 = auto). Overrides the run card. Use 1 for deterministic parity.
        #[arg(long)]
        threads: Option<usize>,
    },

    /// Check a run card and print the resolved configuration
    Validate {
        /// Run card (YAML, or JSON with a `.json` extension)
        #[arg(short, long)]
        config: PathBuf,

        /// Output file (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print version
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt().with_max_level(cli.log_level).with_target(false).init();

    match cli.command {
        Commands::Run { config, events, output, threads } => {
            run::cmd_run(&config, &events, output.as_ref(), threads)
        }
        Commands::Validate { config, output } => run::cmd_validate(&config, output.as_ref()),
        Commands::Version => {
            println!("evsel {}", es_core::VERSION);
            Ok(())
        }
    }
}

fn write_json(output: Option<&PathBuf>, value: serde_json::Value) -> Result<()> {
    if let Some(path) = output {
        std::fs::write(path, serde_json::to_string_pretty(&value)?)?;
    } else {
        println!("{}", serde_json::to_string_pretty(&value)?);
    }
    Ok(())
}
