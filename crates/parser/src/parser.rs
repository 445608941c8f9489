//! Capsule parser: source discovery, syntax trees and metric aggregation

use glob::Pattern;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tree_sitter::{Language, Parser, Tree};
use walkdir::{DirEntry, WalkDir};

use crate::complexity::{estimate_migration_hours, maintainability_index, quality_metrics};
use crate::error::{ParserError, ParserResult};
use crate::metadata::{
    build_metadata, capsule_id_from_dir, load_manifest, resolve_capsule_id, CapsuleManifest,
};
use crate::types::{ComplexityMetrics, ParsedCapsule};
use crate::visitor::CapsuleVisitor;

/// Directories that never hold capsule sources
pub const DEFAULT_EXCLUDE_DIRS: [&str; 7] = [
    "node_modules",
    "dist",
    "build",
    "coverage",
    "out",
    ".git",
    ".next",
];

const TEST_DIRS: [&str; 3] = ["__tests__", "test", "tests"];
const TEST_SUFFIXES: [&str; 4] = [".test.ts", ".spec.ts", ".test.tsx", ".spec.tsx"];

/// Source discovery options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Analyze `*.test.ts` / `*.spec.ts` files and test directories
    #[serde(default)]
    pub include_tests: bool,

    /// Directory names skipped while walking
    #[serde(default = "default_exclude_dirs")]
    pub exclude_dirs: Vec<String>,

    /// Glob patterns matched against paths relative to the capsule root
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

fn default_exclude_dirs() -> Vec<String> {
    DEFAULT_EXCLUDE_DIRS.iter().map(|d| d.to_string()).collect()
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            include_tests: false,
            exclude_dirs: default_exclude_dirs(),
            exclude_patterns: Vec::new(),
        }
    }
}

/// One source file read from disk
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub content: String,
}

/// Parses capsule directories into [`ParsedCapsule`] values
#[derive(Debug, Clone, Default)]
pub struct CapsuleParser {
    config: ParserConfig,
}

impl CapsuleParser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse a capsule directory
    ///
    /// Files are read asynchronously; tree building and analysis run on the
    /// blocking pool. Each call uses a fresh visitor.
    pub async fn parse_capsule(&self, capsule_path: &Path) -> ParserResult<ParsedCapsule> {
        if !capsule_path.exists() {
            return Err(ParserError::PathNotFound {
                path: capsule_path.to_path_buf(),
            });
        }
        if !capsule_path.is_dir() {
            return Err(ParserError::NotADirectory {
                path: capsule_path.to_path_buf(),
            });
        }

        let capsule_id = capsule_id_from_dir(capsule_path);
        info!("Parsing capsule {} at {:?}", capsule_id, capsule_path);

        let files = self.discover_sources(capsule_path)?;
        if files.is_empty() {
            return Err(ParserError::NoSourceFiles {
                capsule_id,
                path: capsule_path.to_path_buf(),
            });
        }
        debug!("Found {} source files", files.len());

        let mut sources = Vec::with_capacity(files.len());
        for path in files {
            let content =
                tokio::fs::read_to_string(&path)
                    .await
                    .map_err(|source| ParserError::Io {
                        path: path.clone(),
                        source,
                    })?;
            sources.push(SourceFile { path, content });
        }

        let root = capsule_path.to_path_buf();
        let task_id = capsule_id.clone();
        let parsed = tokio::task::spawn_blocking(move || {
            let manifest = load_manifest(&root)?.map(|(_, manifest)| manifest);
            analyze_sources(&root, sources, manifest)
        })
        .await
        .map_err(|e| ParserError::Task {
            capsule_id: task_id,
            message: e.to_string(),
        })??;

        info!(
            "Parsed capsule {}: {} declarations, {} lines, complexity {}",
            parsed.metadata.id,
            parsed.analysis.declaration_count(),
            parsed.complexity.lines_of_code,
            parsed.complexity.cyclomatic_complexity
        );
        Ok(parsed)
    }

    /// Id the capsule at `capsule_path` will be migrated under
    ///
    /// Only the manifest is read, so this is cheap enough to run over a whole
    /// batch before any capsule is parsed.
    pub async fn resolve_id(&self, capsule_path: &Path) -> ParserResult<String> {
        let root = capsule_path.to_path_buf();
        let task_id = capsule_id_from_dir(capsule_path);
        tokio::task::spawn_blocking(move || {
            let manifest = load_manifest(&root)?.map(|(_, manifest)| manifest);
            Ok::<_, ParserError>(resolve_capsule_id(&root, manifest.as_ref()))
        })
        .await
        .map_err(|e| ParserError::Task {
            capsule_id: task_id,
            message: e.to_string(),
        })?
    }

    /// TypeScript sources under the capsule root, sorted by path
    pub fn discover_sources(&self, capsule_path: &Path) -> ParserResult<Vec<PathBuf>> {
        let patterns: Vec<Pattern> = self
            .config
            .exclude_patterns
            .iter()
            .filter_map(|p| match Pattern::new(p) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    warn!("Ignoring invalid exclude pattern '{}': {}", p, e);
                    None
                }
            })
            .collect();

        let mut files = Vec::new();
        let walker = WalkDir::new(capsule_path)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !self.is_excluded_dir(entry));

        for entry in walker {
            let entry = entry.map_err(|e| ParserError::Io {
                path: e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| capsule_path.to_path_buf()),
                source: e.into(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if !is_typescript_source(path) {
                continue;
            }
            if !self.config.include_tests && is_test_file(path) {
                debug!("Skipping test file {:?}", path);
                continue;
            }

            let relative = path.strip_prefix(capsule_path).unwrap_or(path);
            if patterns.iter().any(|p| p.matches_path(relative)) {
                debug!("Skipping excluded file {:?}", path);
                continue;
            }

            files.push(path.to_path_buf());
        }

        files.sort();
        Ok(files)
    }

    fn is_excluded_dir(&self, entry: &DirEntry) -> bool {
        if !entry.file_type().is_dir() {
            return false;
        }
        let name = entry.file_name().to_string_lossy();
        self.config.exclude_dirs.iter().any(|d| d == name.as_ref())
            || (!self.config.include_tests && TEST_DIRS.contains(&name.as_ref()))
    }
}

/// Build syntax trees for every file and run the visitor over them
pub fn analyze_sources(
    root: &Path,
    sources: Vec<SourceFile>,
    manifest: Option<CapsuleManifest>,
) -> ParserResult<ParsedCapsule> {
    let mut ts_parser = new_parser(tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into())?;
    let mut tsx_parser = new_parser(tree_sitter_typescript::LANGUAGE_TSX.into())?;

    // Whole-program view: every tree is built before any is visited
    let mut program: Vec<(SourceFile, Tree)> = Vec::with_capacity(sources.len());
    for source in sources {
        let parser = if is_tsx(&source.path) {
            &mut tsx_parser
        } else {
            &mut ts_parser
        };
        let tree = parser
            .parse(&source.content, None)
            .ok_or_else(|| ParserError::Language(format!("parser returned no tree for {:?}", source.path)))?;
        if tree.root_node().has_error() {
            warn!("Syntax errors in {:?}; analysis may be partial", source.path);
        }
        program.push((source, tree));
    }

    let mut visitor = CapsuleVisitor::new(root);
    for (source, tree) in &program {
        visitor.visit_file(&source.path, &source.content, tree);
    }
    let output = visitor.finish();

    let lines_of_code: usize = output.files.iter().map(|f| f.lines_of_code).sum();
    let cyclomatic_complexity: u32 = output.files.iter().map(|f| f.cyclomatic_complexity).sum();

    let complexity = ComplexityMetrics {
        lines_of_code,
        cyclomatic_complexity,
        maintainability_index: maintainability_index(lines_of_code, cyclomatic_complexity),
        estimated_migration_hours: estimate_migration_hours(lines_of_code, cyclomatic_complexity),
        files: output.files,
    };

    let quality = quality_metrics(&output.analysis);
    let metadata = build_metadata(root, manifest, &output.analysis, output.uses_browser_globals);

    Ok(ParsedCapsule {
        metadata,
        analysis: output.analysis,
        complexity,
        quality,
        source_files: program.into_iter().map(|(source, _)| source.path).collect(),
    })
}

fn new_parser(language: Language) -> ParserResult<Parser> {
    let mut parser = Parser::new();
    parser
        .set_language(&language)
        .map_err(|e| ParserError::Language(e.to_string()))?;
    Ok(parser)
}

fn is_typescript_source(path: &Path) -> bool {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    if name.ends_with(".d.ts") {
        return false;
    }
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("ts") | Some("tsx")
    )
}

fn is_tsx(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("tsx")
}

fn is_test_file(path: &Path) -> bool {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    TEST_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}
