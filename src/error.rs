use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while turning seed artifacts into SQL.
///
/// The first four variants are per-artifact: the run records them and moves
/// on to the next artifact. `WriteFailure` is fatal.
#[derive(Debug, Error)]
pub enum SeedError {
    /// A declared source artifact is absent from the input directory.
    #[error("artifact not found: {0}")]
    MissingArtifact(PathBuf),

    /// The artifact exists but could not be read or parsed as JSON.
    #[error("malformed artifact {name}: {detail}")]
    MalformedArtifact { name: String, detail: String },

    /// The artifact parsed but yielded no usable records (or no statements).
    #[error("artifact {0} produced no usable records")]
    EmptyArtifact(String),

    /// A record filtered down to zero columns, so no statement can be built.
    #[error("record for table {table} has no columns after filtering")]
    EmptyRecord { table: String },

    /// The final script could not be persisted.
    #[error("failed to write {path}")]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
