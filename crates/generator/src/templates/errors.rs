//! `errors.ts`: error code enum, base error and one subclass per kind

use crate::context::{CapabilityFlags, TemplateContext};
use crate::error::TemplateError;
use crate::templates::{
    doc_comment, ensure_identifier, exported, external_imports, file_header, identifiers,
    skipped_comments, FileKind, SiblingImports,
};
use std::collections::BTreeSet;

/// One generated error kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorKind {
    pub code: &'static str,
    pub class_name: &'static str,
    pub description: &'static str,
}

const fn kind(code: &'static str, class_name: &'static str, description: &'static str) -> ErrorKind {
    ErrorKind {
        code,
        class_name,
        description,
    }
}

/// Present in every capsule
pub const BASE_ERROR_KINDS: [ErrorKind; 8] = [
    kind("CONFIGURATION_ERROR", "ConfigurationError", "Invalid or missing configuration"),
    kind("VALIDATION_ERROR", "ValidationError", "Input failed validation"),
    kind("INITIALIZATION_ERROR", "InitializationError", "Service could not be initialized"),
    kind("EXECUTION_ERROR", "ExecutionError", "Operation failed while executing"),
    kind("RESOURCE_ERROR", "ResourceError", "A required resource is unavailable"),
    kind("TIMEOUT_ERROR", "TimeoutError", "Operation exceeded its time limit"),
    kind("PERMISSION_ERROR", "PermissionError", "Operation is not permitted"),
    kind("NOT_FOUND_ERROR", "NotFoundError", "Requested item does not exist"),
];

const NETWORK_ERROR: ErrorKind = kind("NETWORK_ERROR", "NetworkError", "Network request failed");
const FILE_SYSTEM_ERROR: ErrorKind =
    kind("FILE_SYSTEM_ERROR", "FileSystemError", "File system operation failed");
const DATABASE_ERROR: ErrorKind = kind("DATABASE_ERROR", "DatabaseError", "Database operation failed");

/// Always appended after the capability kinds
pub const CATCH_ALL_ERROR_KINDS: [ErrorKind; 3] = [
    kind("RESOURCE_EXHAUSTED", "ResourceExhaustedError", "A resource limit was reached"),
    kind("FATAL_ERROR", "FatalError", "Unrecoverable failure"),
    kind("UNKNOWN_ERROR", "UnknownError", "Unclassified failure"),
];

/// Error kinds for a capsule: base set, capability additions, catch-alls
pub fn error_kinds(flags: CapabilityFlags) -> Vec<ErrorKind> {
    let mut kinds = BASE_ERROR_KINDS.to_vec();
    if flags.has_network {
        kinds.push(NETWORK_ERROR);
    }
    if flags.has_file_system {
        kinds.push(FILE_SYSTEM_ERROR);
    }
    if flags.has_database {
        kinds.push(DATABASE_ERROR);
    }
    kinds.extend(CATCH_ALL_ERROR_KINDS);
    kinds
}

pub fn render(ctx: &TemplateContext) -> Result<String, TemplateError> {
    let base = ctx.base_error_name();
    ensure_identifier(&base, "base error class")?;

    let mut content = file_header(ctx, "Error definitions");

    let tokens: BTreeSet<&str> = ctx
        .preserved
        .errors
        .iter()
        .flat_map(|e| identifiers(&e.source_text))
        .collect();
    let externals = external_imports(ctx, &tokens);
    let imports = SiblingImports::referenced(ctx, FileKind::Errors, &tokens);
    if !externals.is_empty() || !imports.is_empty() {
        content.push_str(&externals);
        content.push_str(&imports.render());
        content.push('\n');
    }

    content.push_str("export enum ErrorCode {\n");
    for kind in &ctx.error_kinds {
        content.push_str(&format!("  {} = '{}',\n", kind.code, kind.code));
    }
    content.push_str("}\n\n");

    content.push_str("export type ErrorContext = Record<string, unknown>;\n\n");

    content.push_str(&format!("/** Base class for every {} error */\n", ctx.metadata.name));
    content.push_str(&format!("export class {base} extends Error {{\n"));
    content.push_str("  public readonly code: ErrorCode;\n");
    content.push_str("  public readonly context?: ErrorContext;\n\n");
    content.push_str(
        "  constructor(message: string, code: ErrorCode = ErrorCode.UNKNOWN_ERROR, context?: ErrorContext) {\n",
    );
    content.push_str("    super(message);\n");
    content.push_str(&format!("    this.name = '{base}';\n"));
    content.push_str("    this.code = code;\n");
    content.push_str("    this.context = context;\n");
    content.push_str("    Object.setPrototypeOf(this, new.target.prototype);\n");
    content.push_str("  }\n\n");
    content.push_str("  toJSON(): Record<string, unknown> {\n");
    content.push_str("    return { name: this.name, code: this.code, message: this.message, context: this.context };\n");
    content.push_str("  }\n");
    content.push_str("}\n");

    for kind in &ctx.error_kinds {
        content.push_str(&format!("\n/** {} */\n", kind.description));
        content.push_str(&format!("export class {} extends {base} {{\n", kind.class_name));
        content.push_str("  constructor(message: string, context?: ErrorContext) {\n");
        content.push_str(&format!("    super(message, ErrorCode.{}, context);\n", kind.code));
        content.push_str(&format!("    this.name = '{}';\n", kind.class_name));
        content.push_str("  }\n");
        content.push_str("}\n");
    }

    content.push_str(&format!(
        "\nexport function is{base}(error: unknown): error is {base} {{\n"
    ));
    content.push_str(&format!("  return error instanceof {base};\n"));
    content.push_str("}\n\n");

    content.push_str("/** Wrap anything thrown into the capsule error hierarchy */\n");
    content.push_str(&format!("export function to{base}(error: unknown): {base} {{\n"));
    content.push_str(&format!("  if (error instanceof {base}) {{\n"));
    content.push_str("    return error;\n");
    content.push_str("  }\n");
    content.push_str("  if (error instanceof Error) {\n");
    content.push_str(&format!(
        "    return new {base}(error.message, ErrorCode.UNKNOWN_ERROR, {{ cause: error.name }});\n"
    ));
    content.push_str("  }\n");
    content.push_str(&format!("  return new {base}(String(error), ErrorCode.UNKNOWN_ERROR);\n"));
    content.push_str("}\n");

    if !ctx.preserved.errors.is_empty() {
        content.push_str("\n// Original error classes\n");
    }
    for error in &ctx.preserved.errors {
        content.push('\n');
        content.push_str(&doc_comment(error.docs.as_deref(), ""));
        content.push_str(&exported(&error.source_text));
        content.push('\n');
    }

    let skipped = skipped_comments(ctx, FileKind::Errors);
    if !skipped.is_empty() {
        content.push('\n');
        content.push_str(&skipped);
    }

    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::tests::sample_context;
    use crate::context::tests::{add_cross_references, fixed_time, sample_capsule};
    use crate::context::TemplateContext;
    use capsule_parser::{MigrationMode, Platform};
    use rstest::rstest;

    #[rstest]
    #[case(false, false, false, 11)]
    #[case(true, false, false, 12)]
    #[case(true, true, true, 14)]
    fn test_error_kind_counts(
        #[case] network: bool,
        #[case] file_system: bool,
        #[case] database: bool,
        #[case] expected: usize,
    ) {
        let kinds = error_kinds(CapabilityFlags {
            has_file_system: file_system,
            has_network: network,
            has_database: database,
        });
        assert_eq!(kinds.len(), expected);
        assert!(kinds.len() >= 8);
        assert_eq!(kinds.last().map(|k| k.code), Some("UNKNOWN_ERROR"));
    }

    #[test]
    fn test_errors_file_contents() {
        let ctx = sample_context(vec![Platform::Node], MigrationMode::Auto);
        let content = render(&ctx).unwrap();

        assert!(content.contains("export enum ErrorCode {"));
        assert!(content.contains("  FILE_SYSTEM_ERROR = 'FILE_SYSTEM_ERROR',"));
        assert!(!content.contains("NETWORK_ERROR"));
        assert!(content.contains("export class EmailSenderError extends Error {"));
        assert!(content.contains("export class NotFoundError extends EmailSenderError {"));
        assert!(content.contains("export function toEmailSenderError(error: unknown): EmailSenderError {"));
        assert!(content.contains("export class DeliveryFailure extends Error {}"));

        let subclasses = content.matches("extends EmailSenderError {").count();
        assert_eq!(subclasses, ctx.error_kinds.len());
    }

    #[test]
    fn test_original_errors_import_what_they_reference() {
        let mut capsule = sample_capsule(vec![Platform::Node]);
        add_cross_references(&mut capsule);
        let ctx = TemplateContext::build(&capsule, MigrationMode::Auto, fixed_time());
        let content = render(&ctx).unwrap();

        assert!(content.contains(
            "import { Level } from './types';\nimport { DEFAULT_LEVEL } from './constants';\n\nexport enum ErrorCode {"
        ));
        assert!(content.contains("export class RateLimited extends Error {"));
    }
}
