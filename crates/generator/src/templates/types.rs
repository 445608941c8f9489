//! `types.ts`: shared types plus the original type declarations

use crate::context::TemplateContext;
use crate::error::TemplateError;
use crate::templates::{
    doc_comment, ensure_identifier, exported, external_imports, file_header, identifiers,
    skipped_comments, FileKind, SiblingImports,
};
use std::collections::BTreeSet;

pub fn render(ctx: &TemplateContext) -> Result<String, TemplateError> {
    ensure_identifier(&ctx.class_name, "capsule class name")?;
    let config = ctx.config_name();

    let mut content = file_header(ctx, "Type definitions");

    let tokens: BTreeSet<&str> = ctx
        .preserved
        .types
        .iter()
        .map(|t| t.source_text.as_str())
        .chain(ctx.preserved.interfaces.iter().map(|i| i.source_text.as_str()))
        .flat_map(identifiers)
        .collect();
    let externals = external_imports(ctx, &tokens);
    let imports = SiblingImports::referenced(ctx, FileKind::Types, &tokens);
    if !externals.is_empty() || !imports.is_empty() {
        content.push_str(&externals);
        content.push_str(&imports.render());
        content.push('\n');
    }

    content.push_str("export type Platform = 'node' | 'web' | 'universal';\n\n");
    content.push_str(
        "export type ServiceState = 'uninitialized' | 'initializing' | 'ready' | 'executing' | 'error';\n\n",
    );

    content.push_str(&format!("/** Configuration accepted by the {} service */\n", ctx.metadata.name));
    content.push_str(&format!("export interface {config} {{\n"));
    content.push_str("  /** Emit debug logging */\n");
    content.push_str("  debug?: boolean;\n");
    content.push_str("  /** Operation timeout in milliseconds */\n");
    content.push_str("  timeout?: number;\n");
    content.push_str("  /** Retry attempts for failed operations */\n");
    content.push_str("  retries?: number;\n");
    content.push_str("  /** Force a platform instead of detecting it */\n");
    content.push_str("  platform?: Platform;\n");
    content.push_str("  [key: string]: unknown;\n");
    content.push_str("}\n\n");

    content.push_str("export interface OperationResult<T = unknown> {\n");
    content.push_str("  success: boolean;\n");
    content.push_str("  data?: T;\n");
    content.push_str("  error?: string;\n");
    content.push_str("  duration: number;\n");
    content.push_str("}\n\n");

    content.push_str("export interface PlatformCapabilities {\n");
    content.push_str("  supportsFileSystem: boolean;\n");
    content.push_str("  supportsNetwork: boolean;\n");
    content.push_str("  supportsConsoleColors: boolean;\n");
    content.push_str("  supportsLocalStorage: boolean;\n");
    content.push_str("  supportsProcessEnv: boolean;\n");
    content.push_str("}\n\n");

    content.push_str("export interface CapsuleInfo {\n");
    content.push_str("  id: string;\n");
    content.push_str("  name: string;\n");
    content.push_str("  version: string;\n");
    content.push_str("  category: string;\n");
    content.push_str("  platforms: readonly Platform[];\n");
    content.push_str("}\n");

    let preserved = &ctx.preserved;
    if !preserved.types.is_empty() || !preserved.interfaces.is_empty() {
        content.push_str("\n// Original type declarations\n\n");
    }
    for declaration in &preserved.types {
        content.push_str(&doc_comment(declaration.docs.as_deref(), ""));
        content.push_str(&exported(&declaration.source_text));
        content.push_str("\n\n");
    }
    for declaration in &preserved.interfaces {
        content.push_str(&doc_comment(declaration.docs.as_deref(), ""));
        content.push_str(&exported(&declaration.source_text));
        content.push_str("\n\n");
    }

    let skipped = skipped_comments(ctx, FileKind::Types);
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
    use crate::context::tests::{add_cross_references, fixed_time, location, sample_capsule};
    use crate::context::TemplateContext;
    use capsule_parser::InterfaceInfo;
    use capsule_parser::{MigrationMode, Platform};

    #[test]
    fn test_types_carry_shared_and_original_declarations() {
        let ctx = sample_context(vec![Platform::Node], MigrationMode::Auto);
        let content = render(&ctx).unwrap();

        assert!(content.contains("export type ServiceState = 'uninitialized' | 'initializing' | 'ready' | 'executing' | 'error';"));
        assert!(content.contains("export interface EmailSenderConfig {"));
        assert!(content.contains("/** Mail transport */\nexport type Transport = 'smtp' | 'ses';"));
        assert!(content.contains("export interface EmailMessage {"));
        assert!(content.contains("// Skipped original declaration Platform: name is reserved"));
    }

    #[test]
    fn test_invalid_class_name_is_rejected() {
        let mut ctx = sample_context(vec![Platform::Node], MigrationMode::Auto);
        ctx.class_name = "1bad".to_string();
        assert!(matches!(
            render(&ctx),
            Err(TemplateError::InvalidIdentifier { .. })
        ));
    }

    #[test]
    fn test_types_import_names_from_sibling_files() {
        let mut capsule = sample_capsule(vec![Platform::Node]);
        add_cross_references(&mut capsule);
        capsule.analysis.interfaces.push(InterfaceInfo {
            name: "SendResult".to_string(),
            exported: true,
            docs: None,
            location: location(40),
            extends: Vec::new(),
            members: Vec::new(),
            source_text: "interface SendResult {\n  level: Level;\n  error?: RateLimited;\n}".to_string(),
        });
        let ctx = TemplateContext::build(&capsule, MigrationMode::Auto, fixed_time());
        let content = render(&ctx).unwrap();

        // type positions only, so even classes come in as types
        assert!(content.contains("import type { RateLimited } from './errors';\n\nexport type Platform"));
        assert!(!content.contains("import { Level }"));
        assert!(content.contains("export enum Level { Low, High }"));
    }
}
