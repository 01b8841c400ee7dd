//! # Kiln - Pokédex seed data to SQL
//!
//! A library and CLI for converting the fixed set of Pokédex JSON seed
//! artifacts into a single dependency-ordered SQL bootstrap script.
//!
//! ## Modules
//!
//! - **schema**: static registry of artifacts, table kinds, and whitelists
//! - **sqlgen**: value encoding, record normalization, statement expansion
//! - **runner**: the orchestrator that assembles and writes the script
//!
//! ## Quick Start
//!
//! ```rust
//! use kiln::schema::schema_for;
//! use kiln::sqlgen::{insert_statement, normalize};
//! use serde_json::json;
//!
//! let record = json!({"id": 1, "name": "Fire", "color": "red", "extra": "drop-me"});
//! let row = normalize(record.as_object().unwrap(), &schema_for("types")).unwrap();
//! let statement = insert_statement("types", &row);
//!
//! assert_eq!(
//!     statement.text,
//!     "INSERT INTO types (id, name, color) VALUES (1, 'Fire', 'red');"
//! );
//! ```
//!
//! Running the whole pipeline is one call:
//!
//! ```rust,no_run
//! use kiln::{generate, ScriptOptions};
//!
//! # fn main() -> Result<(), kiln::SeedError> {
//! let report = generate("data/json", "database/seeds/init-data.sql", ScriptOptions::default())?;
//! assert!(report.all_succeeded());
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

pub mod error;
pub mod runner;
pub mod schema;
pub mod sqlgen;

// Re-export commonly used types for convenience
pub use error::SeedError;
pub use runner::{ArtifactOutcome, GenerationReport, Generator, ScriptOptions};
pub use schema::{TypeLookup, ARTIFACTS, CANONICAL_TABLES};
pub use sqlgen::{sql_literal, NormalizedRow, SqlStatement};

/// Main entry point: generate the seed script from an artifact directory.
///
/// Per-artifact failures are recorded in the returned report rather than
/// returned as errors; only a failed final write is an `Err`.
pub fn generate(
    input_dir: impl Into<PathBuf>,
    output_path: impl Into<PathBuf>,
    options: ScriptOptions,
) -> Result<GenerationReport, SeedError> {
    Generator::new(input_dir, output_path)
        .with_options(options)
        .run()
}
