//! Capsule data model produced by the parser

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Runtime platform a capsule targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Node-like server runtime
    Node,

    /// Browser-like runtime
    Web,

    /// Runs anywhere, no platform-specific APIs
    Universal,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Node => "node",
            Platform::Web => "web",
            Platform::Universal => "universal",
        }
    }

    /// Parse a platform name as written in a manifest
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "node" | "nodejs" | "node.js" | "server" => Some(Platform::Node),
            "web" | "browser" | "dom" => Some(Platform::Web),
            "universal" | "isomorphic" | "any" => Some(Platform::Universal),
            _ => None,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a capsule, derived from its directory name and optional manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapsuleMetadata {
    pub id: String,
    pub name: String,
    pub category: String,
    pub description: String,
    pub version: String,
    pub platforms: Vec<Platform>,
    pub dependencies: Vec<String>,
}

impl CapsuleMetadata {
    pub fn is_multi_platform(&self) -> bool {
        self.platforms.len() > 1
    }
}

/// Location of a declaration in the capsule sources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: PathBuf,
    pub line: usize,
    pub column: usize,
}

/// Type alias or enum declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeInfo {
    pub name: String,
    pub exported: bool,
    pub docs: Option<String>,
    pub location: SourceLocation,
    /// `true` for `enum` declarations
    pub is_enum: bool,
    pub definition: String,
    pub source_text: String,
}

/// Interface member signature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberInfo {
    pub name: String,
    pub type_text: Option<String>,
    pub optional: bool,
    pub is_method: bool,
}

/// Interface (shape) declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceInfo {
    pub name: String,
    pub exported: bool,
    pub docs: Option<String>,
    pub location: SourceLocation,
    pub extends: Vec<String>,
    pub members: Vec<MemberInfo>,
    pub source_text: String,
}

/// Function parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamInfo {
    pub name: String,
    pub type_text: Option<String>,
    pub optional: bool,
}

/// Class method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodInfo {
    pub name: String,
    pub params: Vec<ParamInfo>,
    pub return_type: Option<String>,
    pub is_async: bool,
    pub is_static: bool,
}

/// Class declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassInfo {
    pub name: String,
    pub exported: bool,
    pub docs: Option<String>,
    pub location: SourceLocation,
    pub extends: Option<String>,
    pub implements: Vec<String>,
    pub methods: Vec<MethodInfo>,
    pub properties: Vec<String>,
    pub is_abstract: bool,
    pub source_text: String,
}

/// Function declaration, including `const f = () => ...` forms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionInfo {
    pub name: String,
    pub exported: bool,
    pub docs: Option<String>,
    pub location: SourceLocation,
    pub params: Vec<ParamInfo>,
    pub return_type: Option<String>,
    pub is_async: bool,
    pub source_text: String,
}

/// Top-level `const` declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstantInfo {
    pub name: String,
    pub exported: bool,
    pub docs: Option<String>,
    pub location: SourceLocation,
    pub type_annotation: Option<String>,
    pub value: String,
}

/// Top-level `let`/`var` declaration: module state shared by functions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableInfo {
    pub name: String,
    pub exported: bool,
    pub docs: Option<String>,
    pub location: SourceLocation,
    /// The whole statement for this one declarator, e.g. `let hits = 0;`
    pub source_text: String,
}

/// Import statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportInfo {
    pub source: String,
    pub default_import: Option<String>,
    pub namespace_import: Option<String>,
    pub named: Vec<String>,
    pub type_only: bool,
    pub location: SourceLocation,
    pub source_text: String,
}

impl ImportInfo {
    /// Relative imports point at other capsule files
    pub fn is_relative(&self) -> bool {
        self.source.starts_with('.') || self.source.starts_with('/')
    }

    /// Package name of the import source, without `node:` prefix or subpath
    pub fn package_name(&self) -> String {
        package_name_of(&self.source)
    }
}

/// Resolve the package part of a module specifier
pub fn package_name_of(source: &str) -> String {
    let source = source.strip_prefix("node:").unwrap_or(source);
    let mut parts = source.split('/');
    match parts.next() {
        Some(scope) if scope.starts_with('@') => match parts.next() {
            Some(name) => format!("{scope}/{name}"),
            None => scope.to_string(),
        },
        Some(name) => name.to_string(),
        None => String::new(),
    }
}

/// Kind of export statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportKind {
    /// `export { a, b }` or `export <declaration>`
    Named,

    /// `export default ...`
    Default,

    /// `export { a } from './x'`
    ReExport,

    /// `export * from './x'`
    Wildcard,
}

/// Export statement entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportInfo {
    pub name: String,
    pub kind: ExportKind,
    pub source: Option<String>,
    pub location: SourceLocation,
}

/// Class that extends an `*Error` base
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorClassInfo {
    pub name: String,
    pub extends: String,
    pub exported: bool,
    pub docs: Option<String>,
    pub location: SourceLocation,
    pub source_text: String,
}

/// Flat lists of everything extracted from the capsule sources
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CapsuleAnalysis {
    pub types: Vec<TypeInfo>,
    pub interfaces: Vec<InterfaceInfo>,
    pub classes: Vec<ClassInfo>,
    pub functions: Vec<FunctionInfo>,
    pub constants: Vec<ConstantInfo>,
    #[serde(default)]
    pub variables: Vec<VariableInfo>,
    pub imports: Vec<ImportInfo>,
    pub exports: Vec<ExportInfo>,
    pub errors: Vec<ErrorClassInfo>,
}

impl CapsuleAnalysis {
    /// Total number of top-level declarations
    pub fn declaration_count(&self) -> usize {
        self.types.len()
            + self.interfaces.len()
            + self.classes.len()
            + self.functions.len()
            + self.constants.len()
            + self.variables.len()
    }

    /// External imports in first-seen order, one per package
    pub fn external_packages(&self) -> Vec<String> {
        let mut packages: Vec<String> = Vec::new();
        for import in self.imports.iter().filter(|i| !i.is_relative()) {
            let name = import.package_name();
            if !name.is_empty() && !packages.contains(&name) {
                packages.push(name);
            }
        }
        packages
    }
}

/// Per-file size and complexity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMetrics {
    pub path: PathBuf,
    pub lines_of_code: usize,
    pub cyclomatic_complexity: u32,
}

/// Capsule-level complexity metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexityMetrics {
    pub lines_of_code: usize,
    pub cyclomatic_complexity: u32,
    pub maintainability_index: f64,
    pub estimated_migration_hours: f64,
    pub files: Vec<FileMetrics>,
}

/// Existence checks over the analysis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityMetrics {
    pub has_types: bool,
    pub has_error_hierarchy: bool,
    pub has_tests: bool,
    pub has_documentation: bool,
}

/// Result of a single `parse_capsule` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedCapsule {
    pub metadata: CapsuleMetadata,
    pub analysis: CapsuleAnalysis,
    pub complexity: ComplexityMetrics,
    pub quality: QualityMetrics,
    pub source_files: Vec<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_name_of() {
        assert_eq!(package_name_of("fs"), "fs");
        assert_eq!(package_name_of("node:fs/promises"), "fs");
        assert_eq!(package_name_of("@prisma/client"), "@prisma/client");
        assert_eq!(package_name_of("@scope/pkg/sub/path"), "@scope/pkg");
        assert_eq!(package_name_of("lodash/merge"), "lodash");
    }

    #[test]
    fn test_platform_from_name() {
        assert_eq!(Platform::from_name("Browser"), Some(Platform::Web));
        assert_eq!(Platform::from_name("node"), Some(Platform::Node));
        assert_eq!(Platform::from_name("isomorphic"), Some(Platform::Universal));
        assert_eq!(Platform::from_name("mainframe"), None);
    }
}
