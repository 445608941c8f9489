//! Result types for generation operations

use capsule_parser::MigrationMode;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::PathBuf;

use crate::templates::FileKind;

/// One file written to the capsule output directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedFile {
    pub kind: FileKind,
    pub path: PathBuf,
    pub content: String,
    /// Size in bytes
    pub size: usize,
    /// SHA-256 of the content, hex encoded
    pub checksum: String,
}

impl GeneratedFile {
    pub fn new(kind: FileKind, path: PathBuf, content: String) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        Self {
            kind,
            path,
            size: content.len(),
            checksum: hex::encode(hasher.finalize()),
            content,
        }
    }

    pub fn line_count(&self) -> usize {
        self.content.lines().count()
    }
}

/// Outcome of one generation call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    pub capsule_id: String,
    pub output_dir: PathBuf,
    pub mode: MigrationMode,
    /// True only when no template or write failed
    pub success: bool,
    pub files: Vec<GeneratedFile>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    /// Follow-ups listed in the README's migration notes
    pub manual_actions: Vec<String>,
}

impl GenerationResult {
    pub fn total_lines(&self) -> usize {
        self.files.iter().map(GeneratedFile::line_count).sum()
    }

    pub fn total_bytes(&self) -> usize {
        self.files.iter().map(|f| f.size).sum()
    }

    pub fn file(&self, kind: FileKind) -> Option<&GeneratedFile> {
        self.files.iter().find(|f| f.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_file_checksum_and_lines() {
        let file = GeneratedFile::new(
            FileKind::Types,
            PathBuf::from("/out/types.ts"),
            "export type A = string;\n".to_string(),
        );
        assert_eq!(file.size, 24);
        assert_eq!(file.line_count(), 1);
        assert_eq!(file.checksum.len(), 64);

        let same = GeneratedFile::new(FileKind::Types, PathBuf::from("/elsewhere"), file.content.clone());
        assert_eq!(same.checksum, file.checksum);
    }
}
