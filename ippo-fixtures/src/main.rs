#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

//! Writes a synthetic one-month activity log CSV.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ippo_fixtures::{generate_entries, write_csv_file, DEFAULT_DAYS};

/// Activity log fixture generator.
#[derive(Parser)]
#[command(name = "ippo-fixtures")]
#[command(about = "Generate a synthetic activity log CSV", long_about = None)]
struct Cli {
    /// Output file.
    #[arg(short, long, default_value = "test_data_1month.csv")]
    output: PathBuf,

    /// RNG seed for reproducible output.
    #[arg(long)]
    seed: Option<u64>,

    /// Days before today to start from.
    #[arg(long, default_value_t = DEFAULT_DAYS)]
    days: u32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let mut rng = cli
        .seed
        .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);

    let end = chrono::Local::now().naive_local();
    let entries = generate_entries(&mut rng, end, cli.days)?;
    write_csv_file(&cli.output, &entries)?;

    info!(seed = ?cli.seed, days = cli.days, "fixture written");
    println!("Generated {} entries in {}", entries.len(), cli.output.display());
    Ok(())
}
