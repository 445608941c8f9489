//! `constants.ts`: capsule identity, defaults and the original constants

use crate::context::TemplateContext;
use crate::error::TemplateError;
use crate::naming::quote;
use crate::templates::{
    doc_comment, external_imports, file_header, identifiers, skipped_comments, FileKind,
    SiblingImports,
};
use std::collections::BTreeSet;

pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 100;

pub fn render(ctx: &TemplateContext) -> Result<String, TemplateError> {
    let metadata = &ctx.metadata;
    let mut content = file_header(ctx, "Constants");

    let tokens: BTreeSet<&str> = ctx
        .preserved
        .constants
        .iter()
        .flat_map(|c| c.type_annotation.as_deref().into_iter().chain([c.value.as_str()]))
        .flat_map(identifiers)
        .collect();
    content.push_str(&external_imports(ctx, &tokens));
    let mut imports = SiblingImports::referenced(ctx, FileKind::Constants, &tokens);
    imports.type_only(FileKind::Types, "Platform");
    content.push_str(&imports.render());
    content.push('\n');

    content.push_str(&format!("export const CAPSULE_ID = {};\n", quote(&metadata.id)));
    content.push_str(&format!("export const CAPSULE_NAME = {};\n", quote(&metadata.name)));
    content.push_str(&format!("export const CAPSULE_VERSION = {};\n", quote(&metadata.version)));
    content.push_str(&format!("export const CAPSULE_CATEGORY = {};\n\n", quote(&metadata.category)));

    let platforms = metadata
        .platforms
        .iter()
        .map(|p| quote(p.as_str()))
        .collect::<Vec<_>>()
        .join(", ");
    content.push_str(&format!(
        "export const SUPPORTED_PLATFORMS: readonly Platform[] = [{platforms}];\n\n"
    ));

    content.push_str(&format!("export const DEFAULT_TIMEOUT_MS = {DEFAULT_TIMEOUT_MS};\n"));
    content.push_str(&format!("export const DEFAULT_RETRY_ATTEMPTS = {DEFAULT_RETRY_ATTEMPTS};\n"));
    content.push_str(&format!("export const DEFAULT_RETRY_DELAY_MS = {DEFAULT_RETRY_DELAY_MS};\n\n"));

    content.push_str("export const DEFAULT_CONFIG = {\n");
    content.push_str("  debug: false,\n");
    content.push_str("  timeout: DEFAULT_TIMEOUT_MS,\n");
    content.push_str("  retries: DEFAULT_RETRY_ATTEMPTS,\n");
    content.push_str("};\n");

    if !ctx.preserved.constants.is_empty() {
        content.push_str("\n// Original constants\n\n");
    }
    for constant in &ctx.preserved.constants {
        content.push_str(&doc_comment(constant.docs.as_deref(), ""));
        let annotation = constant
            .type_annotation
            .as_deref()
            .map(|t| format!(": {t}"))
            .unwrap_or_default();
        content.push_str(&format!(
            "export const {}{} = {};\n",
            constant.name, annotation, constant.value
        ));
    }

    let skipped = skipped_comments(ctx, FileKind::Constants);
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

    #[test]
    fn test_constants_file_contents() {
        let ctx = sample_context(vec![Platform::Node, Platform::Web], MigrationMode::Auto);
        let content = render(&ctx).unwrap();

        assert!(content.contains("export const CAPSULE_ID = 'email-sender';"));
        assert!(content.contains("export const CAPSULE_VERSION = '1.2.0';"));
        assert!(content.contains(
            "export const SUPPORTED_PLATFORMS: readonly Platform[] = ['node', 'web'];"
        ));
        assert!(content.contains("export const DEFAULT_TIMEOUT_MS = 30000;"));
        assert!(content.contains("export const MAX_RECIPIENTS: number = 50;"));
    }

    #[test]
    fn test_constants_import_the_names_they_reference() {
        let mut capsule = sample_capsule(vec![Platform::Node]);
        add_cross_references(&mut capsule);
        let ctx = TemplateContext::build(&capsule, MigrationMode::Auto, fixed_time());
        let content = render(&ctx).unwrap();

        assert!(content.contains(
            "import type { Platform, Transport } from './types';\nimport { Level } from './types';\n\n"
        ));
        assert!(content.contains("export const DEFAULT_TRANSPORT: Transport = 'smtp';"));
        assert!(content.contains("export const DEFAULT_LEVEL = Level.Low;"));
    }
}
