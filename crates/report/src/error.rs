//! Report persistence errors

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to write report {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize report for {context}: {source}")]
    Serialization {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ReportError {
    pub fn code(&self) -> &'static str {
        match self {
            ReportError::Io { .. } => "REPORT_IO",
            ReportError::Serialization { .. } => "REPORT_SERIALIZATION",
        }
    }
}

pub type ReportResult<T> = Result<T, ReportError>;
