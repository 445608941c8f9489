//! Parser error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while parsing a capsule
#[derive(Error, Debug)]
pub enum ParserError {
    #[error("Capsule path does not exist: {path:?}")]
    PathNotFound { path: PathBuf },

    #[error("Capsule path is not a directory: {path:?}")]
    NotADirectory { path: PathBuf },

    #[error("No TypeScript source files found in capsule {capsule_id} at {path:?}")]
    NoSourceFiles { capsule_id: String, path: PathBuf },

    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to initialize TypeScript grammar: {0}")]
    Language(String),

    #[error("Invalid manifest {path:?}: {message}")]
    Manifest { path: PathBuf, message: String },

    #[error("Parse task for capsule {capsule_id} failed: {message}")]
    Task { capsule_id: String, message: String },
}

impl ParserError {
    /// Stable machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            ParserError::PathNotFound { .. } => "PARSE_PATH_NOT_FOUND",
            ParserError::NotADirectory { .. } => "PARSE_NOT_A_DIRECTORY",
            ParserError::NoSourceFiles { .. } => "PARSE_NO_SOURCE_FILES",
            ParserError::Io { .. } => "PARSE_IO",
            ParserError::Language(_) => "PARSE_LANGUAGE",
            ParserError::Manifest { .. } => "PARSE_MANIFEST",
            ParserError::Task { .. } => "PARSE_TASK",
        }
    }

    /// Context payload identifying what failed
    pub fn context(&self) -> String {
        match self {
            ParserError::PathNotFound { path }
            | ParserError::NotADirectory { path }
            | ParserError::Io { path, .. }
            | ParserError::Manifest { path, .. } => path.display().to_string(),
            ParserError::NoSourceFiles { capsule_id, .. }
            | ParserError::Task { capsule_id, .. } => capsule_id.clone(),
            ParserError::Language(_) => "typescript".to_string(),
        }
    }
}

pub type ParserResult<T> = Result<T, ParserError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_and_context() {
        let err = ParserError::NoSourceFiles {
            capsule_id: "email-sender".to_string(),
            path: PathBuf::from("/tmp/email-sender"),
        };
        assert_eq!(err.code(), "PARSE_NO_SOURCE_FILES");
        assert_eq!(err.context(), "email-sender");

        let err = ParserError::PathNotFound {
            path: PathBuf::from("/missing"),
        };
        assert_eq!(err.code(), "PARSE_PATH_NOT_FOUND");
        assert_eq!(err.context(), "/missing");
    }
}
