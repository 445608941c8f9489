//! File templates
//!
//! Every template is a pure function of the [`TemplateContext`]. They are run
//! in [`FileKind::ALL`] order because later templates import names that
//! earlier ones define by convention.

pub mod adapters;
pub mod constants;
pub mod errors;
pub mod index;
pub mod readme;
pub mod service;
pub mod types;
pub mod utils;

use capsule_parser::MigrationMode;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::context::TemplateContext;
use crate::error::TemplateError;
use crate::naming::is_identifier;

pub type TemplateFn = fn(&TemplateContext) -> Result<String, TemplateError>;

/// The eight files of a generated capsule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Types,
    Errors,
    Constants,
    Utils,
    Adapters,
    Service,
    Index,
    Readme,
}

impl FileKind {
    pub const ALL: [FileKind; 8] = [
        FileKind::Types,
        FileKind::Errors,
        FileKind::Constants,
        FileKind::Utils,
        FileKind::Adapters,
        FileKind::Service,
        FileKind::Index,
        FileKind::Readme,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            FileKind::Types => "types.ts",
            FileKind::Errors => "errors.ts",
            FileKind::Constants => "constants.ts",
            FileKind::Utils => "utils.ts",
            FileKind::Adapters => "adapters.ts",
            FileKind::Service => "service.ts",
            FileKind::Index => "index.ts",
            FileKind::Readme => "README.md",
        }
    }

    /// Relative import specifier, for the TypeScript files
    pub fn module_path(&self) -> Option<&'static str> {
        match self {
            FileKind::Types => Some("./types"),
            FileKind::Errors => Some("./errors"),
            FileKind::Constants => Some("./constants"),
            FileKind::Utils => Some("./utils"),
            FileKind::Adapters => Some("./adapters"),
            FileKind::Service => Some("./service"),
            FileKind::Index | FileKind::Readme => None,
        }
    }

    pub fn is_source(&self) -> bool {
        !matches!(self, FileKind::Readme)
    }

    pub fn template(&self) -> TemplateFn {
        match self {
            FileKind::Types => types::render,
            FileKind::Errors => errors::render,
            FileKind::Constants => constants::render,
            FileKind::Utils => utils::render,
            FileKind::Adapters => adapters::render,
            FileKind::Service => service::render,
            FileKind::Index => index::render,
            FileKind::Readme => readme::render,
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// File names every generated capsule directory must hold
pub fn required_files() -> [&'static str; 8] {
    FileKind::ALL.map(|kind| kind.file_name())
}

pub(crate) fn ensure_identifier(name: &str, role: &'static str) -> Result<(), TemplateError> {
    if is_identifier(name) {
        Ok(())
    } else {
        Err(TemplateError::InvalidIdentifier {
            name: name.to_string(),
            role,
        })
    }
}

/// Leading file comment; deliberately free of timestamps
pub(crate) fn file_header(ctx: &TemplateContext, title: &str) -> String {
    let mut content = String::new();
    content.push_str("/**\n");
    content.push_str(&format!(" * {} - {}\n", ctx.metadata.name, title));
    content.push_str(" *\n");
    content.push_str(&format!(
        " * Capsule {} v{} ({} migration)\n",
        ctx.metadata.id, ctx.metadata.version, ctx.mode
    ));
    content.push_str(" */\n\n");
    content
}

pub(crate) fn doc_comment(docs: Option<&str>, indent: &str) -> String {
    let Some(docs) = docs else {
        return String::new();
    };
    let lines: Vec<&str> = docs.lines().collect();
    if lines.len() == 1 {
        return format!("{indent}/** {} */\n", lines[0].replace("*/", "* /"));
    }

    let mut comment = format!("{indent}/**\n");
    for line in lines {
        comment.push_str(&format!("{indent} * {}\n", line.replace("*/", "* /")));
    }
    comment.push_str(&format!("{indent} */\n"));
    comment
}

/// Original declaration text with an `export` keyword in front
pub(crate) fn exported(source_text: &str) -> String {
    let trimmed = source_text.trim();
    if trimmed.starts_with("export ") {
        trimmed.to_string()
    } else {
        format!("export {trimmed}")
    }
}

pub(crate) fn skipped_comments(ctx: &TemplateContext, kind: FileKind) -> String {
    let mut content = String::new();
    for skipped in ctx.preserved.skipped_for(kind) {
        content.push_str(&format!(
            "// Skipped original declaration {}: {}\n",
            skipped.name, skipped.reason
        ));
    }
    if !content.is_empty() {
        content.push('\n');
    }
    content
}

/// Import lines a file needs for the preserved code it carries
///
/// Names are imported from the generated file that defines them. Enums,
/// classes, constants and functions are values; aliases and interfaces are
/// type-only. A types file only ever uses names in type positions.
#[derive(Debug, Clone)]
pub(crate) struct SiblingImports {
    target: FileKind,
    values: BTreeMap<FileKind, BTreeSet<String>>,
    types: BTreeMap<FileKind, BTreeSet<String>>,
}

impl SiblingImports {
    pub(crate) fn new(target: FileKind) -> Self {
        Self {
            target,
            values: BTreeMap::new(),
            types: BTreeMap::new(),
        }
    }

    /// Imports for every importable name that occurs in `tokens`
    pub(crate) fn referenced(ctx: &TemplateContext, target: FileKind, tokens: &BTreeSet<&str>) -> Self {
        let mut imports = Self::new(target);
        for (name, owner, is_value) in importable_names(ctx) {
            if tokens.contains(name.as_str()) {
                imports.add(owner, name, is_value);
            }
        }
        imports
    }

    pub(crate) fn value(&mut self, from: FileKind, name: &str) {
        self.add(from, name.to_string(), true);
    }

    pub(crate) fn type_only(&mut self, from: FileKind, name: &str) {
        self.add(from, name.to_string(), false);
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.values.is_empty() && self.types.is_empty()
    }

    fn add(&mut self, from: FileKind, name: String, is_value: bool) {
        if from == self.target {
            return;
        }
        let imports = if is_value && self.target != FileKind::Types {
            &mut self.values
        } else {
            &mut self.types
        };
        imports.entry(from).or_default().insert(name);
    }

    pub(crate) fn render(&self) -> String {
        let mut content = String::new();
        for kind in FileKind::ALL {
            let Some(module) = kind.module_path() else {
                continue;
            };
            let values = self.values.get(&kind);
            if let Some(names) = self.types.get(&kind) {
                let names: Vec<&str> = names
                    .iter()
                    .filter(|name| !values.is_some_and(|v| v.contains(*name)))
                    .map(String::as_str)
                    .collect();
                if !names.is_empty() {
                    content.push_str(&format!(
                        "import type {{ {} }} from '{module}';\n",
                        names.join(", ")
                    ));
                }
            }
            if let Some(names) = values {
                let names: Vec<&str> = names.iter().map(String::as_str).collect();
                content.push_str(&format!("import {{ {} }} from '{module}';\n", names.join(", ")));
            }
        }
        content
    }
}

/// Every name a template may import: name, defining file, runtime value
fn importable_names(ctx: &TemplateContext) -> Vec<(String, FileKind, bool)> {
    let preserved = &ctx.preserved;
    let mut names = Vec::new();

    for item in &preserved.types {
        names.push((item.name.clone(), FileKind::Types, item.is_enum));
    }
    for item in &preserved.interfaces {
        names.push((item.name.clone(), FileKind::Types, false));
    }
    names.push((ctx.base_error_name(), FileKind::Errors, true));
    for kind in &ctx.error_kinds {
        names.push((kind.class_name.to_string(), FileKind::Errors, true));
    }
    for item in &preserved.errors {
        names.push((item.name.clone(), FileKind::Errors, true));
    }
    for item in &preserved.constants {
        names.push((item.name.clone(), FileKind::Constants, true));
    }
    // manual mode leaves these as porting notes
    if ctx.mode != MigrationMode::Manual {
        for item in &preserved.functions {
            names.push((item.name.clone(), FileKind::Utils, true));
        }
        for item in &preserved.classes {
            names.push((item.name.clone(), FileKind::Utils, true));
        }
    }
    names
}

/// Original external import statements with a binding that `tokens` uses
pub(crate) fn external_imports(ctx: &TemplateContext, tokens: &BTreeSet<&str>) -> String {
    let mut content = String::new();
    let mut bound: BTreeSet<&str> = BTreeSet::new();
    for import in &ctx.imports {
        let used: Vec<&str> = import
            .default_import
            .iter()
            .chain(import.namespace_import.iter())
            .chain(import.named.iter())
            .map(String::as_str)
            .filter(|binding| tokens.contains(binding))
            .collect();
        // the same import often appears in several original files
        let mut fresh = false;
        for binding in used {
            fresh |= bound.insert(binding);
        }
        if fresh {
            content.push_str(import.source_text.trim());
            content.push('\n');
        }
    }
    content
}

/// Identifier-like tokens in a piece of source text
pub(crate) fn identifiers(text: &str) -> BTreeSet<&str> {
    text.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '$'))
        .filter(|token| !token.is_empty())
        .collect()
}
