//! Declaration visitor over TypeScript syntax trees
//!
//! A [`CapsuleVisitor`] is created for one parse call, fed every file of the
//! capsule, and consumed by [`CapsuleVisitor::finish`]. It holds all the
//! accumulated state, so nothing survives between parse calls.

use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use tree_sitter::{Node, Tree};

use crate::complexity::{count_lines, cyclomatic_complexity};
use crate::types::*;

/// Globals that only exist in browser runtimes
const BROWSER_GLOBALS: [&str; 5] = [
    "window",
    "document",
    "localStorage",
    "sessionStorage",
    "navigator",
];

/// Everything the visitor accumulated
#[derive(Debug, Clone)]
pub struct VisitorOutput {
    pub analysis: CapsuleAnalysis,
    pub files: Vec<FileMetrics>,
    pub uses_browser_globals: bool,
}

/// Accumulating visitor for one capsule
pub struct CapsuleVisitor {
    root: PathBuf,
    analysis: CapsuleAnalysis,
    files: Vec<FileMetrics>,
    uses_browser_globals: bool,
}

/// Per-file state threaded through the visit methods
struct FileScope<'a> {
    source: &'a str,
    relative_path: PathBuf,
}

impl CapsuleVisitor {
    /// Create a visitor for the capsule rooted at `root`
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            analysis: CapsuleAnalysis::default(),
            files: Vec::new(),
            uses_browser_globals: false,
        }
    }

    /// Visit every top-level statement of one file and score it
    pub fn visit_file(&mut self, path: &Path, source: &str, tree: &Tree) {
        let relative_path = path
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.to_path_buf());
        debug!("Visiting {:?}", relative_path);

        let scope = FileScope {
            source,
            relative_path: relative_path.clone(),
        };
        let root = tree.root_node();

        let mut cursor = root.walk();
        for statement in root.named_children(&mut cursor) {
            self.visit_statement(&statement, &scope);
        }

        if !self.uses_browser_globals && references_browser_globals(&root, source) {
            self.uses_browser_globals = true;
        }

        self.files.push(FileMetrics {
            path: relative_path,
            lines_of_code: count_lines(source),
            cyclomatic_complexity: cyclomatic_complexity(&root, source),
        });
    }

    /// Resolve error classes and hand back the accumulator
    pub fn finish(mut self) -> VisitorOutput {
        self.analysis.errors = collect_error_classes(&self.analysis.classes);
        VisitorOutput {
            analysis: self.analysis,
            files: self.files,
            uses_browser_globals: self.uses_browser_globals,
        }
    }

    fn visit_statement(&mut self, node: &Node, scope: &FileScope) {
        trace!("Top-level node: {}", node.kind());
        match node.kind() {
            "import_statement" => self.visit_import(node, scope),
            "export_statement" => self.visit_export(node, scope),
            _ => {
                let docs = leading_doc_comment(node, scope.source);
                self.visit_declaration(node, scope, false, docs);
            }
        }
    }

    /// Returns the declared names so exports can be recorded
    fn visit_declaration(
        &mut self,
        node: &Node,
        scope: &FileScope,
        exported: bool,
        docs: Option<String>,
    ) -> Vec<String> {
        match node.kind() {
            "type_alias_declaration" => self.visit_type_alias(node, scope, exported, docs),
            "enum_declaration" => self.visit_enum(node, scope, exported, docs),
            "interface_declaration" => self.visit_interface(node, scope, exported, docs),
            "class_declaration" | "abstract_class_declaration" | "class" => {
                self.visit_class(node, scope, exported, docs)
            }
            "function_declaration" | "generator_function_declaration" => {
                self.visit_function(node, scope, exported, docs)
            }
            "lexical_declaration" | "variable_declaration" => {
                self.visit_lexical(node, scope, exported, docs)
            }
            _ => Vec::new(),
        }
    }

    fn visit_import(&mut self, node: &Node, scope: &FileScope) {
        let source = node
            .child_by_field_name("source")
            .or_else(|| find_child(node, "string"))
            .map(|s| unquote(&node_text(&s, scope.source)))
            .unwrap_or_default();

        let mut import = ImportInfo {
            source,
            default_import: None,
            namespace_import: None,
            named: Vec::new(),
            type_only: has_token(node, "type"),
            location: location(node, scope),
            source_text: node_text(node, scope.source),
        };

        if let Some(clause) = find_child(node, "import_clause") {
            let mut cursor = clause.walk();
            for part in clause.named_children(&mut cursor) {
                match part.kind() {
                    "identifier" => import.default_import = Some(node_text(&part, scope.source)),
                    "namespace_import" => {
                        import.namespace_import = find_child(&part, "identifier")
                            .map(|id| node_text(&id, scope.source));
                    }
                    "named_imports" => {
                        let mut spec_cursor = part.walk();
                        for spec in part.named_children(&mut spec_cursor) {
                            if spec.kind() != "import_specifier" {
                                continue;
                            }
                            let local = spec
                                .child_by_field_name("alias")
                                .or_else(|| spec.child_by_field_name("name"));
                            if let Some(local) = local {
                                import.named.push(node_text(&local, scope.source));
                            }
                        }
                    }
                    _ => {}
                }
            }
        }

        self.analysis.imports.push(import);
    }

    fn visit_export(&mut self, node: &Node, scope: &FileScope) {
        let docs = leading_doc_comment(node, scope.source);
        let is_default = has_token(node, "default");
        let source = node
            .child_by_field_name("source")
            .map(|s| unquote(&node_text(&s, scope.source)));
        let loc = location(node, scope);

        if let Some(declaration) = node.child_by_field_name("declaration") {
            let names = self.visit_declaration(&declaration, scope, true, docs);
            let kind = if is_default {
                ExportKind::Default
            } else {
                ExportKind::Named
            };
            for name in names {
                self.push_export(name, kind, None, loc.clone());
            }
            return;
        }

        if is_default {
            self.push_export("default".to_string(), ExportKind::Default, None, loc);
            return;
        }

        if let Some(clause) = find_child(node, "export_clause") {
            let kind = if source.is_some() {
                ExportKind::ReExport
            } else {
                ExportKind::Named
            };
            let mut cursor = clause.walk();
            for spec in clause.named_children(&mut cursor) {
                if spec.kind() != "export_specifier" {
                    continue;
                }
                let exported_name = spec
                    .child_by_field_name("alias")
                    .or_else(|| spec.child_by_field_name("name"));
                if let Some(name) = exported_name {
                    self.push_export(
                        node_text(&name, scope.source),
                        kind,
                        source.clone(),
                        loc.clone(),
                    );
                }
            }
            return;
        }

        if has_token(node, "*") {
            let name = find_child(node, "namespace_export")
                .and_then(|ns| find_child(&ns, "identifier"))
                .map(|id| node_text(&id, scope.source))
                .unwrap_or_else(|| "*".to_string());
            self.push_export(name, ExportKind::Wildcard, source, loc);
        }
    }

    fn push_export(
        &mut self,
        name: String,
        kind: ExportKind,
        source: Option<String>,
        location: SourceLocation,
    ) {
        self.analysis.exports.push(ExportInfo {
            name,
            kind,
            source,
            location,
        });
    }

    fn visit_type_alias(
        &mut self,
        node: &Node,
        scope: &FileScope,
        exported: bool,
        docs: Option<String>,
    ) -> Vec<String> {
        let Some(name) = field_text(node, "name", scope.source) else {
            return Vec::new();
        };
        self.analysis.types.push(TypeInfo {
            name: name.clone(),
            exported,
            docs,
            location: location(node, scope),
            is_enum: false,
            definition: field_text(node, "value", scope.source).unwrap_or_default(),
            source_text: node_text(node, scope.source),
        });
        vec![name]
    }

    fn visit_enum(
        &mut self,
        node: &Node,
        scope: &FileScope,
        exported: bool,
        docs: Option<String>,
    ) -> Vec<String> {
        let Some(name) = field_text(node, "name", scope.source) else {
            return Vec::new();
        };
        self.analysis.types.push(TypeInfo {
            name: name.clone(),
            exported,
            docs,
            location: location(node, scope),
            is_enum: true,
            definition: field_text(node, "body", scope.source).unwrap_or_default(),
            source_text: node_text(node, scope.source),
        });
        vec![name]
    }

    fn visit_interface(
        &mut self,
        node: &Node,
        scope: &FileScope,
        exported: bool,
        docs: Option<String>,
    ) -> Vec<String> {
        let Some(name) = field_text(node, "name", scope.source) else {
            return Vec::new();
        };

        let extends = find_child(node, "extends_type_clause")
            .map(|clause| named_child_texts(&clause, scope.source))
            .unwrap_or_default();

        let mut members = Vec::new();
        if let Some(body) = node.child_by_field_name("body") {
            let mut cursor = body.walk();
            for member in body.named_children(&mut cursor) {
                match member.kind() {
                    "property_signature" => {
                        if let Some(member_name) = field_text(&member, "name", scope.source) {
                            members.push(MemberInfo {
                                name: member_name,
                                type_text: field_text(&member, "type", scope.source)
                                    .map(|t| strip_annotation(&t)),
                                optional: has_token(&member, "?"),
                                is_method: false,
                            });
                        }
                    }
                    "method_signature" => {
                        if let Some(member_name) = field_text(&member, "name", scope.source) {
                            members.push(MemberInfo {
                                name: member_name,
                                type_text: field_text(&member, "return_type", scope.source)
                                    .map(|t| strip_annotation(&t)),
                                optional: has_token(&member, "?"),
                                is_method: true,
                            });
                        }
                    }
                    _ => {}
                }
            }
        }

        self.analysis.interfaces.push(InterfaceInfo {
            name: name.clone(),
            exported,
            docs,
            location: location(node, scope),
            extends,
            members,
            source_text: node_text(node, scope.source),
        });
        vec![name]
    }

    fn visit_class(
        &mut self,
        node: &Node,
        scope: &FileScope,
        exported: bool,
        docs: Option<String>,
    ) -> Vec<String> {
        let Some(name) = field_text(node, "name", scope.source) else {
            return Vec::new();
        };

        let mut extends = None;
        let mut implements = Vec::new();
        if let Some(heritage) = find_child(node, "class_heritage") {
            let mut cursor = heritage.walk();
            for clause in heritage.named_children(&mut cursor) {
                match clause.kind() {
                    "extends_clause" => {
                        extends = clause
                            .child_by_field_name("value")
                            .or_else(|| clause.named_child(0))
                            .map(|v| base_name(&node_text(&v, scope.source)));
                    }
                    "implements_clause" => {
                        implements = named_child_texts(&clause, scope.source);
                    }
                    _ => {}
                }
            }
        }

        let mut methods = Vec::new();
        let mut properties = Vec::new();
        if let Some(body) = node.child_by_field_name("body") {
            let mut cursor = body.walk();
            for member in body.named_children(&mut cursor) {
                match member.kind() {
                    "method_definition" | "method_signature" | "abstract_method_signature" => {
                        if let Some(method_name) = field_text(&member, "name", scope.source) {
                            methods.push(MethodInfo {
                                name: method_name,
                                params: parameters(&member, scope.source),
                                return_type: field_text(&member, "return_type", scope.source)
                                    .map(|t| strip_annotation(&t)),
                                is_async: has_token(&member, "async"),
                                is_static: has_token(&member, "static"),
                            });
                        }
                    }
                    "public_field_definition" => {
                        if let Some(property) = field_text(&member, "name", scope.source) {
                            properties.push(property);
                        }
                    }
                    _ => {}
                }
            }
        }

        self.analysis.classes.push(ClassInfo {
            name: name.clone(),
            exported,
            docs,
            location: location(node, scope),
            extends,
            implements,
            methods,
            properties,
            is_abstract: node.kind() == "abstract_class_declaration",
            source_text: node_text(node, scope.source),
        });
        vec![name]
    }

    fn visit_function(
        &mut self,
        node: &Node,
        scope: &FileScope,
        exported: bool,
        docs: Option<String>,
    ) -> Vec<String> {
        let Some(name) = field_text(node, "name", scope.source) else {
            return Vec::new();
        };
        self.analysis.functions.push(FunctionInfo {
            name: name.clone(),
            exported,
            docs,
            location: location(node, scope),
            params: parameters(node, scope.source),
            return_type: field_text(node, "return_type", scope.source)
                .map(|t| strip_annotation(&t)),
            is_async: has_token(node, "async"),
            source_text: node_text(node, scope.source),
        });
        vec![name]
    }

    /// `const` declarators are constants or functions; `let`/`var` are module state
    fn visit_lexical(
        &mut self,
        node: &Node,
        scope: &FileScope,
        exported: bool,
        docs: Option<String>,
    ) -> Vec<String> {
        let keyword = ["const", "let", "var"]
            .into_iter()
            .find(|keyword| has_token(node, keyword))
            .unwrap_or("var");

        let mut names = Vec::new();
        let mut cursor = node.walk();
        for declarator in node.named_children(&mut cursor) {
            if declarator.kind() != "variable_declarator" {
                continue;
            }
            let Some(name) = field_text(&declarator, "name", scope.source) else {
                continue;
            };
            let declarator_text = format!("{keyword} {};", node_text(&declarator, scope.source));

            if keyword != "const" {
                self.analysis.variables.push(VariableInfo {
                    name: name.clone(),
                    exported,
                    docs: docs.clone(),
                    location: location(&declarator, scope),
                    source_text: declarator_text,
                });
                names.push(name);
                continue;
            }

            let value = declarator.child_by_field_name("value");
            match value {
                Some(function)
                    if matches!(
                        function.kind(),
                        "arrow_function" | "function_expression" | "function"
                    ) =>
                {
                    self.analysis.functions.push(FunctionInfo {
                        name: name.clone(),
                        exported,
                        docs: docs.clone(),
                        location: location(&declarator, scope),
                        params: parameters(&function, scope.source),
                        return_type: field_text(&function, "return_type", scope.source)
                            .map(|t| strip_annotation(&t)),
                        is_async: has_token(&function, "async"),
                        source_text: declarator_text,
                    });
                }
                _ => {
                    self.analysis.constants.push(ConstantInfo {
                        name: name.clone(),
                        exported,
                        docs: docs.clone(),
                        location: location(&declarator, scope),
                        type_annotation: field_text(&declarator, "type", scope.source)
                            .map(|t| strip_annotation(&t)),
                        value: value
                            .map(|v| node_text(&v, scope.source))
                            .unwrap_or_default(),
                    });
                }
            }
            names.push(name);
        }
        names
    }
}

/// Classes extending an `*Error` base directly, or through one capsule class
fn collect_error_classes(classes: &[ClassInfo]) -> Vec<ErrorClassInfo> {
    classes
        .iter()
        .filter_map(|class| {
            let base = class.extends.as_ref()?;
            let is_error = base.contains("Error")
                || classes
                    .iter()
                    .find(|parent| &parent.name == base)
                    .and_then(|parent| parent.extends.as_ref())
                    .map(|grandparent| grandparent.contains("Error"))
                    .unwrap_or(false);

            is_error.then(|| ErrorClassInfo {
                name: class.name.clone(),
                extends: base.clone(),
                exported: class.exported,
                docs: class.docs.clone(),
                location: class.location.clone(),
                source_text: class.source_text.clone(),
            })
        })
        .collect()
}

fn parameters(node: &Node, source: &str) -> Vec<ParamInfo> {
    // Arrow functions with a bare identifier use the `parameter` field
    if let Some(single) = node.child_by_field_name("parameter") {
        return vec![ParamInfo {
            name: node_text(&single, source),
            type_text: None,
            optional: false,
        }];
    }

    let Some(list) = node.child_by_field_name("parameters") else {
        return Vec::new();
    };

    let mut params = Vec::new();
    let mut cursor = list.walk();
    for param in list.named_children(&mut cursor) {
        let optional = match param.kind() {
            "required_parameter" => false,
            "optional_parameter" => true,
            _ => continue,
        };
        let name = param
            .child_by_field_name("pattern")
            .map(|p| node_text(&p, source))
            .unwrap_or_default();
        params.push(ParamInfo {
            name,
            type_text: field_text(&param, "type", source).map(|t| strip_annotation(&t)),
            optional,
        });
    }
    params
}

fn references_browser_globals(node: &Node, source: &str) -> bool {
    if node.kind() == "identifier" {
        if let Ok(name) = node.utf8_text(source.as_bytes()) {
            if BROWSER_GLOBALS.contains(&name) {
                return true;
            }
        }
    }
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .any(|child| references_browser_globals(&child, source));
    found
}

/// `/** ... */` comment directly above a node
fn leading_doc_comment(node: &Node, source: &str) -> Option<String> {
    let comment = node.prev_named_sibling()?;
    if comment.kind() != "comment" {
        return None;
    }
    if comment.end_position().row + 1 < node.start_position().row {
        return None;
    }
    let text = node_text(&comment, source);
    if !text.starts_with("/**") {
        return None;
    }

    let body = text.trim_start_matches("/**").trim_end_matches("*/");
    let cleaned = body
        .lines()
        .map(|line| line.trim().trim_start_matches('*').trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    (!cleaned.is_empty()).then_some(cleaned)
}

fn location(node: &Node, scope: &FileScope) -> SourceLocation {
    SourceLocation {
        file: scope.relative_path.clone(),
        line: node.start_position().row + 1,
        column: node.start_position().column + 1,
    }
}

fn node_text(node: &Node, source: &str) -> String {
    source[node.start_byte()..node.end_byte()].to_string()
}

fn field_text(node: &Node, field: &str, source: &str) -> Option<String> {
    node.child_by_field_name(field).map(|n| node_text(&n, source))
}

fn find_child<'tree>(node: &Node<'tree>, kind: &str) -> Option<Node<'tree>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|child| child.kind() == kind);
    found
}

/// Anonymous keyword/punctuation child such as `async`, `default` or `?`
fn has_token(node: &Node, token: &str) -> bool {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .any(|child| !child.is_named() && child.kind() == token);
    found
}

fn named_child_texts(node: &Node, source: &str) -> Vec<String> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .map(|child| node_text(&child, source))
        .collect()
}

/// `: string` becomes `string`
fn strip_annotation(text: &str) -> String {
    text.trim_start_matches(':').trim().to_string()
}

/// `Base<T>` becomes `Base`
fn base_name(text: &str) -> String {
    text.split('<').next().unwrap_or(text).trim().to_string()
}

fn unquote(text: &str) -> String {
    text.trim_matches(|c| c == '"' || c == '\'' || c == '`').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_sitter::Parser;

    fn visit(source: &str) -> VisitorOutput {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into())
            .unwrap();
        let tree = parser.parse(source, None).unwrap();

        let root = PathBuf::from("/capsule");
        let mut visitor = CapsuleVisitor::new(&root);
        visitor.visit_file(&root.join("src/index.ts"), source, &tree);
        visitor.finish()
    }

    #[test]
    fn test_classifies_top_level_declarations() {
        let output = visit(
            r#"
import fs from 'fs';
import { join as joinPath, resolve } from 'node:path';
import * as http from 'http';
import type { Config } from './types';

/** Supported levels */
export type Level = 'debug' | 'info';

export interface Options {
  level: Level;
  prefix?: string;
  format(message: string): string;
}

enum Color { Red, Green }

export const DEFAULT_LEVEL: Level = 'info';
let counter = 0;

export async function write(path: string, data?: string): Promise<void> {
  await fs.promises.writeFile(joinPath(path), data ?? '');
}

export const format = (message: string): string => message.trim();

export class Logger {
  private level: Level = 'info';
  static create(): Logger { return new Logger(); }
  async flush(): Promise<void> {}
}
"#,
        );
        let analysis = &output.analysis;

        assert_eq!(analysis.imports.len(), 4);
        assert_eq!(analysis.imports[0].default_import.as_deref(), Some("fs"));
        assert_eq!(analysis.imports[1].source, "node:path");
        assert_eq!(analysis.imports[1].named, vec!["joinPath", "resolve"]);
        assert_eq!(analysis.imports[2].namespace_import.as_deref(), Some("http"));
        assert!(analysis.imports[3].type_only);
        assert!(analysis.imports[3].is_relative());

        assert_eq!(analysis.types.len(), 2);
        assert_eq!(analysis.types[0].name, "Level");
        assert_eq!(analysis.types[0].docs.as_deref(), Some("Supported levels"));
        assert!(analysis.types[0].exported);
        assert!(analysis.types[1].is_enum);
        assert!(!analysis.types[1].exported);

        assert_eq!(analysis.interfaces.len(), 1);
        let options = &analysis.interfaces[0];
        assert_eq!(options.members.len(), 3);
        assert!(options.members[1].optional);
        assert!(options.members[2].is_method);

        assert_eq!(analysis.constants.len(), 1);
        assert_eq!(analysis.constants[0].name, "DEFAULT_LEVEL");
        assert_eq!(analysis.constants[0].type_annotation.as_deref(), Some("Level"));

        assert_eq!(analysis.variables.len(), 1);
        assert_eq!(analysis.variables[0].name, "counter");
        assert_eq!(analysis.variables[0].source_text, "let counter = 0;");
        assert!(!analysis.variables[0].exported);

        assert_eq!(analysis.functions.len(), 2);
        let write = &analysis.functions[0];
        assert!(write.is_async);
        assert_eq!(write.params.len(), 2);
        assert!(write.params[1].optional);
        assert_eq!(write.return_type.as_deref(), Some("Promise<void>"));
        assert_eq!(analysis.functions[1].name, "format");

        assert_eq!(analysis.classes.len(), 1);
        let logger = &analysis.classes[0];
        assert_eq!(logger.methods.len(), 2);
        assert!(logger.methods[0].is_static);
        assert!(logger.methods[1].is_async);
        assert_eq!(logger.properties, vec!["level"]);
        assert_eq!(logger.location.file, PathBuf::from("src/index.ts"));

        let exported: Vec<&str> = analysis.exports.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(
            exported,
            vec!["Level", "Options", "DEFAULT_LEVEL", "write", "format", "Logger"]
        );
    }

    #[test]
    fn test_module_state_declarations() {
        let output = visit(
            r#"
const cache = new Map<string, string>();
/** Lookups served */
let hits = 0, misses = 0;
var lastKey: string | undefined;
export let enabled = true;

export function lookup(key: string): string | undefined {
  lastKey = key;
  const value = cache.get(key);
  if (value === undefined) { misses++; } else { hits++; }
  return value;
}
"#,
        );
        let analysis = &output.analysis;

        let names: Vec<&str> = analysis.variables.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["hits", "misses", "lastKey", "enabled"]);
        assert_eq!(analysis.variables[1].source_text, "let misses = 0;");
        assert_eq!(analysis.variables[1].docs.as_deref(), Some("Lookups served"));
        assert_eq!(analysis.variables[2].source_text, "var lastKey: string | undefined;");
        assert!(analysis.variables[3].exported);

        // locals inside functions are not module state
        assert_eq!(analysis.constants.len(), 1);
        assert_eq!(analysis.constants[0].name, "cache");
        assert_eq!(analysis.declaration_count(), 6);
    }

    #[test]
    fn test_error_classes_one_level_transitive() {
        let output = visit(
            r#"
export class CacheError extends Error {}
class MissError extends CacheError {}
class StaleEntry extends CacheError {}
class Plain {}
class Derived extends Plain {}
"#,
        );
        let names: Vec<&str> = output
            .analysis
            .errors
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["CacheError", "MissError", "StaleEntry"]);
    }

    #[test]
    fn test_re_exports_and_wildcards() {
        let output = visit(
            r#"
export * from './client';
export { send, Mailer as Client } from './mailer';
const local = 1;
export { local };
export default local;
"#,
        );
        let exports = &output.analysis.exports;
        assert_eq!(exports[0].kind, ExportKind::Wildcard);
        assert_eq!(exports[0].source.as_deref(), Some("./client"));
        assert_eq!(exports[1].kind, ExportKind::ReExport);
        assert_eq!(exports[2].name, "Client");
        assert_eq!(exports[3].kind, ExportKind::Named);
        assert_eq!(exports[4].kind, ExportKind::Default);
    }

    #[test]
    fn test_browser_globals_and_file_metrics() {
        let output = visit("export function title(): string {\n  return document.title || 'untitled';\n}\n");
        assert!(output.uses_browser_globals);
        assert_eq!(output.files.len(), 1);
        assert_eq!(output.files[0].lines_of_code, 3);
        assert_eq!(output.files[0].cyclomatic_complexity, 2);
    }

    #[test]
    fn test_detached_comment_is_not_documentation() {
        let output = visit("/** License header */\n\n\nexport type Id = string;\n");
        assert!(output.analysis.types[0].docs.is_none());
    }
}
