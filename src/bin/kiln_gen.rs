//! kiln-gen: generate the database seed script from the JSON artifacts
//!
//! Usage:
//!   # Default paths relative to the project root
//!   kiln-gen
//!
//!   # Explicit input directory
//!   kiln-gen path/to/data/json
//!
//!   # Wrap the statements in a transaction
//!   kiln-gen --transaction -o out/init-data.sql
//!
//! Exits 0 only when every artifact produced at least one statement.

// Use MiMalloc allocator for better performance (recommended by simd-json)
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use kiln::{Generator, ScriptOptions};
use log::{error, info};
use std::path::PathBuf;

const DEFAULT_INPUT_DIR: &str = "data/json";
const DEFAULT_OUTPUT_PATH: &str = "database/seeds/init-data.sql";

#[derive(Parser, Debug)]
#[command(name = "kiln-gen")]
#[command(about = "Generate the database seed script from the JSON artifacts", long_about = None)]
struct Args {
    /// Directory containing the JSON seed artifacts
    #[arg(value_name = "DIR")]
    input: Option<PathBuf>,

    /// Output path for the generated SQL script
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Wrap the generated statements in BEGIN/COMMIT
    #[arg(long)]
    transaction: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let input_dir = args.input.unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT_DIR));
    let output_path = args
        .output
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH));

    if !input_dir.is_dir() {
        bail!("data directory not found: {}", input_dir.display());
    }

    let report = Generator::new(&input_dir, &output_path)
        .with_options(ScriptOptions {
            transaction: args.transaction,
        })
        .run()
        .with_context(|| format!("generating {}", output_path.display()))?;

    for outcome in &report.outcomes {
        match &outcome.error {
            Some(message) => error!("{}: {}", outcome.artifact, message),
            None => info!(
                "{} -> {} ({} statements)",
                outcome.artifact, outcome.table, outcome.statements
            ),
        }
    }
    info!(
        "done: {}/{} artifacts, {} statements, {} unresolved references",
        report.succeeded, report.attempted, report.statements, report.unresolved_references
    );

    if !report.all_succeeded() {
        std::process::exit(1);
    }
    Ok(())
}
