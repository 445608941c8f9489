//! Generator error types

use std::path::PathBuf;
use thiserror::Error;

/// A template refusing to render its context
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("'{name}' is not a valid identifier for the {role}")]
    InvalidIdentifier { name: String, role: &'static str },
}

/// Errors raised while generating a capsule
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Failed to create output directory {path:?} for capsule {capsule_id}: {source}")]
    OutputDirectory {
        capsule_id: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to render {file} for capsule {capsule_id}: {source}")]
    Template {
        capsule_id: String,
        file: &'static str,
        #[source]
        source: TemplateError,
    },

    #[error("Failed to write {path:?} for capsule {capsule_id}: {source}")]
    Write {
        capsule_id: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GeneratorError {
    /// Stable machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            GeneratorError::OutputDirectory { .. } => "GENERATE_OUTPUT_DIRECTORY",
            GeneratorError::Template { .. } => "GENERATE_TEMPLATE",
            GeneratorError::Write { .. } => "GENERATE_WRITE",
        }
    }

    /// Id of the capsule being generated
    pub fn context(&self) -> &str {
        match self {
            GeneratorError::OutputDirectory { capsule_id, .. }
            | GeneratorError::Template { capsule_id, .. }
            | GeneratorError::Write { capsule_id, .. } => capsule_id,
        }
    }
}

pub type GeneratorResult<T> = Result<T, GeneratorError>;
