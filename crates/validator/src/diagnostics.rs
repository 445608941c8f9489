//! Compile-diagnostic providers
//!
//! A provider turns a set of generated TypeScript files into
//! [`Diagnostic`]s. [`SyntaxDiagnostics`] needs nothing but the bundled
//! grammar; [`TscDiagnostics`] shells out to a TypeScript compiler under
//! strict type-checking.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use tree_sitter::{Node, Parser};

use crate::result::Diagnostic;

#[derive(Error, Debug)]
pub enum DiagnosticsError {
    #[error("TypeScript compiler not found: {0}")]
    CompilerNotFound(String),

    #[error("Failed to launch {program:?}: {source}")]
    Launch {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to load TypeScript grammar: {0}")]
    Language(String),

    #[error("Diagnostics task failed: {0}")]
    Task(String),
}

#[async_trait]
pub trait DiagnosticsProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Diagnose `files`, all relative to `dir`
    async fn diagnose(&self, dir: &Path, files: &[&str]) -> Result<Vec<Diagnostic>, DiagnosticsError>;
}

/// Reports tree-sitter ERROR and MISSING nodes
#[derive(Debug, Default, Clone, Copy)]
pub struct SyntaxDiagnostics;

impl SyntaxDiagnostics {
    /// Syntax diagnostics for one source text
    pub fn check_source(file: &Path, source: &str) -> Result<Vec<Diagnostic>, DiagnosticsError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into())
            .map_err(|e| DiagnosticsError::Language(e.to_string()))?;
        let Some(tree) = parser.parse(source, None) else {
            return Ok(vec![Diagnostic {
                message: "source could not be parsed".to_string(),
                file: file.to_path_buf(),
                line: 1,
            }]);
        };

        let mut diagnostics = Vec::new();
        if tree.root_node().has_error() {
            collect_syntax_errors(tree.root_node(), source, file, &mut diagnostics);
        }
        Ok(diagnostics)
    }
}

fn collect_syntax_errors(node: Node, source: &str, file: &Path, out: &mut Vec<Diagnostic>) {
    if node.is_error() {
        let text = node
            .utf8_text(source.as_bytes())
            .unwrap_or_default()
            .lines()
            .next()
            .unwrap_or_default()
            .trim();
        let message = if text.is_empty() {
            "syntax error".to_string()
        } else {
            format!("syntax error near `{}`", truncate(text, 40))
        };
        out.push(Diagnostic {
            message,
            file: file.to_path_buf(),
            line: node.start_position().row + 1,
        });
        return;
    }
    if node.is_missing() {
        out.push(Diagnostic {
            message: format!("missing `{}`", node.kind()),
            file: file.to_path_buf(),
            line: node.start_position().row + 1,
        });
        return;
    }
    if !node.has_error() {
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_syntax_errors(child, source, file, out);
    }
}

fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[async_trait]
impl DiagnosticsProvider for SyntaxDiagnostics {
    fn name(&self) -> &str {
        "syntax"
    }

    async fn diagnose(&self, dir: &Path, files: &[&str]) -> Result<Vec<Diagnostic>, DiagnosticsError> {
        let mut sources = Vec::with_capacity(files.len());
        for file in files {
            let path = dir.join(file);
            let content = tokio::fs::read_to_string(&path)
                .await
                .map_err(|source| DiagnosticsError::Read { path, source })?;
            sources.push((PathBuf::from(file), content));
        }

        tokio::task::spawn_blocking(move || {
            let mut diagnostics = Vec::new();
            for (file, content) in &sources {
                diagnostics.extend(SyntaxDiagnostics::check_source(file, content)?);
            }
            Ok::<_, DiagnosticsError>(diagnostics)
        })
        .await
        .map_err(|e| DiagnosticsError::Task(e.to_string()))?
    }
}

/// Compiler flags for a strict, emit-free type check
pub const TSC_ARGS: [&str; 12] = [
    "--noEmit",
    "--strict",
    "--target",
    "ES2020",
    "--module",
    "ESNext",
    "--moduleResolution",
    "node",
    "--skipLibCheck",
    "--pretty",
    "false",
    "--lib",
];

/// Library set passed after `--lib`
const TSC_LIBS: &str = "ES2020,DOM";

static TSC_DIAGNOSTIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^(.+?)\((\d+),(\d+)\):\s*error\s+(TS\d+):\s*(.*)$").expect("tsc diagnostic pattern")
});

/// Runs `tsc` over the generated files
#[derive(Debug, Clone, Default)]
pub struct TscDiagnostics {
    tsc_path: Option<PathBuf>,
}

impl TscDiagnostics {
    pub fn new(tsc_path: Option<PathBuf>) -> Self {
        Self { tsc_path }
    }

    /// The configured compiler, else `tsc` on `PATH`
    pub fn locate(&self) -> Result<PathBuf, DiagnosticsError> {
        match &self.tsc_path {
            Some(path) if path.is_file() => Ok(path.clone()),
            Some(path) => Err(DiagnosticsError::CompilerNotFound(format!(
                "{} does not exist",
                path.display()
            ))),
            None => which::which("tsc").map_err(|e| DiagnosticsError::CompilerNotFound(e.to_string())),
        }
    }
}

/// Missing ambient declarations, e.g. `process` without `@types/node`
const ENVIRONMENT_CODES: [&str; 4] = ["TS2580", "TS2591", "TS2592", "TS7016"];

static MISSING_MODULE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Cannot find module '([^']+)'").expect("missing module pattern"));

/// Diagnostics caused by packages not installed beside the generated files
///
/// Capsule dependencies are never installed into the output directory, so
/// unresolved package imports say nothing about the generated code. An
/// unresolved relative import still counts.
pub fn is_environment_diagnostic(code: &str, message: &str) -> bool {
    if ENVIRONMENT_CODES.contains(&code) {
        return true;
    }
    code == "TS2307"
        && MISSING_MODULE
            .captures(message)
            .is_some_and(|caps| !caps[1].starts_with('.'))
}

/// Parse `file(line,col): error TSxxxx: message` lines
pub fn parse_tsc_output(output: &str) -> Vec<Diagnostic> {
    TSC_DIAGNOSTIC
        .captures_iter(output)
        .filter(|caps| !is_environment_diagnostic(&caps[4], &caps[5]))
        .map(|caps| Diagnostic {
            message: format!("{}: {}", &caps[4], caps[5].trim()),
            file: PathBuf::from(caps[1].trim()),
            line: caps[2].parse().unwrap_or(0),
        })
        .collect()
}

#[async_trait]
impl DiagnosticsProvider for TscDiagnostics {
    fn name(&self) -> &str {
        "tsc"
    }

    async fn diagnose(&self, dir: &Path, files: &[&str]) -> Result<Vec<Diagnostic>, DiagnosticsError> {
        let program = self.locate()?;
        debug!("Running {:?} over {} files in {:?}", program, files.len(), dir);

        let output = tokio::process::Command::new(&program)
            .args(TSC_ARGS)
            .arg(TSC_LIBS)
            .args(files)
            .current_dir(dir)
            .output()
            .await
            .map_err(|source| DiagnosticsError::Launch { program, source })?;

        // tsc reports type errors on stdout and exits non-zero
        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(parse_tsc_output(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_syntax_diagnostics_clean_source() {
        let source = "export interface A { id: string }\nexport class B<T> { run(x: T): T { return x; } }\n";
        let diagnostics = SyntaxDiagnostics::check_source(Path::new("a.ts"), source).unwrap();
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
    }

    #[test]
    fn test_syntax_diagnostics_reports_line() {
        let source = "export const a = 1;\n\nexport function broken( {\n  return 1;\n";
        let diagnostics = SyntaxDiagnostics::check_source(Path::new("bad.ts"), source).unwrap();
        assert!(!diagnostics.is_empty());
        assert!(diagnostics.iter().all(|d| d.file == Path::new("bad.ts")));
        assert!(diagnostics.iter().all(|d| d.line >= 1));
    }

    #[tokio::test]
    async fn test_syntax_provider_reads_files() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("ok.ts"), "export const x: number = 1;\n").unwrap();
        std::fs::write(temp_dir.path().join("bad.ts"), "export const = ;\n").unwrap();

        let diagnostics = SyntaxDiagnostics
            .diagnose(temp_dir.path(), &["ok.ts", "bad.ts"])
            .await
            .unwrap();
        assert!(!diagnostics.is_empty());
        assert!(diagnostics.iter().all(|d| d.file == Path::new("bad.ts")));
    }

    #[tokio::test]
    async fn test_syntax_provider_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = SyntaxDiagnostics
            .diagnose(temp_dir.path(), &["nope.ts"])
            .await
            .unwrap_err();
        assert!(matches!(err, DiagnosticsError::Read { .. }));
    }

    #[test]
    fn test_parse_tsc_output() {
        let output = "service.ts(12,5): error TS2322: Type 'string' is not assignable to type 'number'.\n\
                      index.ts(3,10): error TS2305: Module './types' has no exported member 'Foo'.\n\
                      Found 2 errors.\n";
        let diagnostics = parse_tsc_output(output);
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].file, PathBuf::from("service.ts"));
        assert_eq!(diagnostics[0].line, 12);
        assert!(diagnostics[0].message.starts_with("TS2322: Type 'string'"));
        assert_eq!(diagnostics[1].line, 3);
    }

    #[test]
    fn test_uninstalled_packages_are_not_reported() {
        let output = "utils.ts(1,34): error TS2307: Cannot find module 'nodemailer' or its corresponding type declarations.\n\
                      utils.ts(2,20): error TS2307: Cannot find module './helpers' or its corresponding type declarations.\n\
                      utils.ts(9,3): error TS2580: Cannot find name 'process'. Do you need to install type definitions for node?\n\
                      constants.ts(5,33): error TS2304: Cannot find name 'Transport'.\n";
        let diagnostics = parse_tsc_output(output);

        let messages: Vec<&str> = diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages.len(), 2, "{messages:?}");
        assert!(messages[0].contains("'./helpers'"));
        assert_eq!(messages[1], "TS2304: Cannot find name 'Transport'.");
    }

    #[test]
    fn test_configured_compiler_must_exist() {
        let provider = TscDiagnostics::new(Some(PathBuf::from("/definitely/not/tsc")));
        assert!(matches!(
            provider.locate(),
            Err(DiagnosticsError::CompilerNotFound(_))
        ));
    }
}
