//! Orchestration - drive every artifact through the pipeline and persist
//! the final script
//!
//! Artifacts are processed strictly in the registry's dependency order,
//! one at a time. A per-artifact failure is recorded and the run moves on;
//! only a failure to write the finished script aborts.

use std::fs;
use std::path::PathBuf;

use log::{error, info, warn};
use serde::Serialize;
use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::error::SeedError;
use crate::schema::{ArtifactSpec, TypeLookup, ARTIFACTS};
use crate::sqlgen::{expand, Expansion};

/// Options for the generated script.
#[derive(Debug, Clone, Default)]
pub struct ScriptOptions {
    /// Wrap the statement body in `BEGIN;` / `COMMIT;`.
    pub transaction: bool,
}

/// Outcome of one artifact within a run.
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactOutcome {
    pub artifact: String,
    pub table: String,
    pub statements: usize,
    pub error: Option<String>,
}

/// Summary of a full generation run.
#[derive(Debug, Default, Serialize)]
pub struct GenerationReport {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub statements: usize,
    /// Name-array junction elements skipped because their name resolved to
    /// no identifier. Skips never fail an artifact.
    pub unresolved_references: usize,
    pub outcomes: Vec<ArtifactOutcome>,
}

impl GenerationReport {
    /// True when every artifact produced at least one statement.
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }

    fn record_success(&mut self, spec: &ArtifactSpec, statements: usize) {
        self.succeeded += 1;
        self.statements += statements;
        self.outcomes.push(ArtifactOutcome {
            artifact: spec.file.to_string(),
            table: spec.table.to_string(),
            statements,
            error: None,
        });
    }

    fn record_failure(&mut self, spec: &ArtifactSpec, message: String) {
        self.failed += 1;
        self.outcomes.push(ArtifactOutcome {
            artifact: spec.file.to_string(),
            table: spec.table.to_string(),
            statements: 0,
            error: Some(message),
        });
    }
}

/// Reads the declared artifacts, expands them into statements, and writes
/// the assembled script.
pub struct Generator {
    input_dir: PathBuf,
    output_path: PathBuf,
    options: ScriptOptions,
    lookup: TypeLookup,
}

impl Generator {
    pub fn new(input_dir: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Generator {
            input_dir: input_dir.into(),
            output_path: output_path.into(),
            options: ScriptOptions::default(),
            lookup: TypeLookup::builtin(),
        }
    }

    pub fn with_options(mut self, options: ScriptOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_lookup(mut self, lookup: TypeLookup) -> Self {
        self.lookup = lookup;
        self
    }

    /// Run the full pipeline. Per-artifact failures land in the report;
    /// the returned error is reserved for a failed final write.
    pub fn run(&self) -> Result<GenerationReport, SeedError> {
        let mut report = GenerationReport::default();
        let mut sections: Vec<String> = Vec::new();

        for spec in ARTIFACTS {
            report.attempted += 1;
            info!("processing {} -> table '{}'", spec.file, spec.table);

            match self.process_artifact(spec) {
                Ok(expansion) => {
                    for name in &expansion.unresolved {
                        warn!("{}: unresolved reference '{}' skipped", spec.file, name);
                    }
                    report.unresolved_references += expansion.unresolved.len();

                    if expansion.statements.is_empty() {
                        let err = SeedError::EmptyArtifact(spec.file.to_string());
                        error!("{err}");
                        report.record_failure(spec, err.to_string());
                    } else {
                        info!(
                            "{}: {} statements generated",
                            spec.file,
                            expansion.statements.len()
                        );
                        sections.push(render_section(spec, &expansion));
                        report.record_success(spec, expansion.statements.len());
                    }
                }
                Err(err) => {
                    error!("{}: {}", spec.file, err);
                    report.record_failure(spec, err.to_string());
                }
            }
        }

        let generated_at = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_else(|_| String::from("unknown"));
        let script = render_script(&sections, &report, &generated_at, &self.options);
        self.persist(&script)?;

        info!(
            "wrote {}: {} statements, {} artifacts ok, {} failed, {} unresolved references",
            self.output_path.display(),
            report.statements,
            report.succeeded,
            report.failed,
            report.unresolved_references
        );
        Ok(report)
    }

    fn process_artifact(&self, spec: &ArtifactSpec) -> Result<Expansion, SeedError> {
        let path = self.input_dir.join(spec.file);
        if !path.is_file() {
            return Err(SeedError::MissingArtifact(path));
        }

        let bytes = fs::read(&path).map_err(|err| SeedError::MalformedArtifact {
            name: spec.file.to_string(),
            detail: format!("read failed: {err}"),
        })?;
        let value = parse_artifact(spec.file, bytes)?;
        let records = promote_records(spec.file, value)?;
        expand(spec, &records, &self.lookup)
    }

    fn persist(&self, script: &str) -> Result<(), SeedError> {
        if let Some(parent) = self.output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| SeedError::WriteFailure {
                    path: self.output_path.clone(),
                    source,
                })?;
            }
        }
        fs::write(&self.output_path, script).map_err(|source| SeedError::WriteFailure {
            path: self.output_path.clone(),
            source,
        })
    }
}

/// Parse artifact bytes, SIMD first with a serde_json fallback so parse
/// failures carry a useful message.
fn parse_artifact(name: &str, bytes: Vec<u8>) -> Result<Value, SeedError> {
    let mut simd_buf = bytes.clone();
    if let Ok(value) = simd_json::serde::from_slice::<Value>(&mut simd_buf) {
        return Ok(value);
    }

    serde_json::from_slice(&bytes).map_err(|err| SeedError::MalformedArtifact {
        name: name.to_string(),
        detail: err.to_string(),
    })
}

/// A bare object is promoted to a one-element collection; an empty array
/// is an empty artifact.
fn promote_records(name: &str, value: Value) -> Result<Vec<Value>, SeedError> {
    match value {
        Value::Array(records) => {
            if records.is_empty() {
                Err(SeedError::EmptyArtifact(name.to_string()))
            } else {
                Ok(records)
            }
        }
        Value::Object(_) => {
            warn!("{name} does not contain an array; treating it as a single record");
            Ok(vec![value])
        }
        _ => Err(SeedError::MalformedArtifact {
            name: name.to_string(),
            detail: "expected a JSON object or an array of objects".to_string(),
        }),
    }
}

fn render_section(spec: &ArtifactSpec, expansion: &Expansion) -> String {
    let mut section = format!("-- Table: {} (source: {})\n", spec.table, spec.file);
    for statement in &expansion.statements {
        section.push_str(&statement.text);
        section.push('\n');
    }
    section
}

fn render_script(
    sections: &[String],
    report: &GenerationReport,
    generated_at: &str,
    options: &ScriptOptions,
) -> String {
    let mut script = String::new();
    script.push_str("-- init-data.sql\n");
    script.push_str("-- Generated from the JSON seed artifacts; do not edit by hand.\n");
    script.push_str(&format!("-- Generated at: {generated_at}\n"));
    script.push('\n');
    script.push_str("-- Begin data load\n\n");
    if options.transaction {
        script.push_str("BEGIN;\n\n");
    }
    for section in sections {
        script.push_str(section);
        script.push('\n');
    }
    if options.transaction {
        script.push_str("COMMIT;\n\n");
    }
    script.push_str("-- End of data load\n");
    script.push_str(&format!(
        "-- Summary: {} artifacts loaded, {} failed\n",
        report.succeeded, report.failed
    ));
    script
}
