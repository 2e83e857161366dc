#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

//! Demo executable for Council Guard.
//!
//! Loads a card catalog and a council response from JSON files, runs the
//! policy validator for the given energy/mood and prints the verdict as
//! JSON. Exit code is 0 for a valid response, 1 for a rejected one and 2
//! when an input cannot be loaded.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use council_guard_core::{
    is_low_state, CardCatalog, CouncilResponse, GuardConfig, PolicyValidator, StateClassifier,
    UserState,
};

/// Council response policy checker.
#[derive(Parser)]
#[command(name = "council-guard")]
#[command(about = "Validate council recommendations against the card policy", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate one response file.
    Validate {
        /// JSON array of `{"card_id", "label"}` records.
        #[arg(long)]
        catalog: PathBuf,

        /// JSON council response.
        #[arg(long)]
        response: PathBuf,

        /// Energy reading.
        #[arg(long, allow_hyphen_values = true)]
        energy: i32,

        /// Mood reading.
        #[arg(long, allow_hyphen_values = true)]
        mood: i32,

        /// YAML policy file; defaults to the environment.
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print whether the readings count as low state.
    Classify {
        /// Energy reading.
        #[arg(long, allow_hyphen_values = true)]
        energy: i32,

        /// Mood reading.
        #[arg(long, allow_hyphen_values = true)]
        mood: i32,

        /// Override the low-state cutoff.
        #[arg(long)]
        threshold: Option<i32>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {e:?}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<bool> {
    match cli.command {
        Commands::Validate {
            catalog,
            response,
            energy,
            mood,
            config,
        } => validate(&catalog, &response, energy, mood, config.as_deref()),
        Commands::Classify {
            energy,
            mood,
            threshold,
        } => {
            let low = threshold.map_or_else(
                || is_low_state(energy, mood),
                |t| StateClassifier::new(t).is_low(&UserState::new(energy, mood)),
            );
            println!("{}", serde_json::json!({ "energy": energy, "mood": mood, "low_state": low }));
            Ok(true)
        }
    }
}

fn validate(
    catalog_path: &Path,
    response_path: &Path,
    energy: i32,
    mood: i32,
    config_path: Option<&Path>,
) -> Result<bool> {
    let config = match config_path {
        Some(path) => GuardConfig::from_yaml(path)?,
        None => GuardConfig::from_env()?,
    };
    debug!(?config, "loaded configuration");

    let raw = std::fs::read_to_string(catalog_path)
        .with_context(|| format!("Unable to read catalog {}", catalog_path.display()))?;
    let catalog = CardCatalog::from_json_str(&raw)
        .with_context(|| format!("Invalid catalog {}", catalog_path.display()))?;

    let raw = std::fs::read_to_string(response_path)
        .with_context(|| format!("Unable to read response {}", response_path.display()))?;
    let response = CouncilResponse::from_json_str(&raw)
        .with_context(|| format!("Invalid response {}", response_path.display()))?;

    info!(cards = catalog.len(), recommendations = response.recommendations.len(), "validating");

    let validator = PolicyValidator::new(config.policy);
    let verdict = validator.validate(&response, &catalog, energy, mood);

    println!("{}", serde_json::to_string_pretty(&verdict)?);
    Ok(verdict.valid)
}
