//! Pipeline-level errors

use capsule_generator::GeneratorError;
use capsule_parser::ParserError;
use capsule_report::ReportError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MigrationError {
    #[error(transparent)]
    Parse(#[from] ParserError),

    #[error(transparent)]
    Generate(#[from] GeneratorError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Capsule id {id} is already taken by {} in this batch", first.display())]
    DuplicateCapsule { id: String, first: PathBuf },

    #[error("Batch aborted on capsule {capsule}: {source}")]
    Orchestration {
        capsule: String,
        #[source]
        source: Box<MigrationError>,
    },
}

impl MigrationError {
    /// Stable machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            MigrationError::Parse(e) => e.code(),
            MigrationError::Generate(e) => e.code(),
            MigrationError::Report(e) => e.code(),
            MigrationError::Config(_) => "CONFIG_INVALID",
            MigrationError::DuplicateCapsule { .. } => "BATCH_DUPLICATE_CAPSULE",
            MigrationError::Orchestration { .. } => "BATCH_ABORTED",
        }
    }
}

pub type MigrationResult<T> = Result<T, MigrationError>;
