//! `index.ts`: public surface, capsule metadata and factory helpers

use crate::context::TemplateContext;
use crate::error::TemplateError;
use crate::naming::quote;
use crate::templates::{ensure_identifier, FileKind};

pub fn render(ctx: &TemplateContext) -> Result<String, TemplateError> {
    let service = ctx.service_name();
    let config = ctx.config_name();
    let class = &ctx.class_name;
    ensure_identifier(class, "factory name")?;

    let metadata = &ctx.metadata;
    let mut content = String::new();

    content.push_str("/**\n");
    content.push_str(&format!(" * {}\n", metadata.name));
    content.push_str(" *\n");
    content.push_str(&format!(" * {}\n", metadata.description.replace("*/", "* /")));
    content.push_str(" *\n");
    content.push_str(&format!(" * @packageDocumentation {}\n", ctx.package_name));
    content.push_str(" */\n\n");

    for kind in FileKind::ALL {
        if let Some(module) = kind.module_path() {
            content.push_str(&format!("export * from '{module}';\n"));
        }
    }
    content.push('\n');

    content.push_str(&format!("import {{ {service} }} from './service';\n"));
    content.push_str(&format!("import type {{ {config}, Platform }} from './types';\n\n"));

    let list = |items: Vec<String>| {
        items
            .iter()
            .map(|i| quote(i))
            .collect::<Vec<_>>()
            .join(", ")
    };
    let platforms = list(metadata.platforms.iter().map(|p| p.as_str().to_string()).collect());
    let dependencies = list(metadata.dependencies.clone());

    content.push_str("export const CAPSULE_METADATA = {\n");
    content.push_str(&format!("  id: {},\n", quote(&metadata.id)));
    content.push_str(&format!("  name: {},\n", quote(&metadata.name)));
    content.push_str(&format!("  version: {},\n", quote(&metadata.version)));
    content.push_str(&format!("  category: {},\n", quote(&metadata.category)));
    content.push_str(&format!("  description: {},\n", quote(&metadata.description)));
    content.push_str(&format!("  platforms: [{platforms}] as Platform[],\n"));
    content.push_str(&format!("  dependencies: [{dependencies}],\n"));
    content.push_str(&format!("  migrationMode: {},\n", quote(ctx.mode.as_str())));
    content.push_str(&format!("  generatedAt: {},\n", quote(&ctx.generated_at)));
    content.push_str("} as const;\n\n");

    content.push_str(&format!("/** Create a {service} without initializing it */\n"));
    content.push_str(&format!(
        "export function create{class}(config?: {config}): {service} {{\n"
    ));
    content.push_str(&format!("  return new {service}(config);\n"));
    content.push_str("}\n\n");

    content.push_str(&format!("/** Create a {service} and wait for it to become ready */\n"));
    content.push_str(&format!(
        "export async function create{class}AndInitialize(config?: {config}): Promise<{service}> {{\n"
    ));
    content.push_str(&format!("  const service = create{class}(config);\n"));
    content.push_str("  await service.initialize();\n");
    content.push_str("  return service;\n");
    content.push_str("}\n\n");

    content.push_str(&format!("export default {service};\n"));

    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::tests::sample_context;
    use capsule_parser::{MigrationMode, Platform};

    #[test]
    fn test_index_reexports_and_factories() {
        let ctx = sample_context(vec![Platform::Node], MigrationMode::Auto);
        let content = render(&ctx).unwrap();

        for module in ["./types", "./errors", "./constants", "./utils", "./adapters", "./service"] {
            assert!(content.contains(&format!("export * from '{module}';")));
        }
        assert!(content.contains("export const CAPSULE_METADATA = {"));
        assert!(content.contains("  platforms: ['node'] as Platform[],"));
        assert!(content.contains("  generatedAt: '2024-01-15T12:00:00Z',"));
        assert!(content.contains("export function createEmailSender(config?: EmailSenderConfig): EmailSenderService {"));
        assert!(content.contains("export async function createEmailSenderAndInitialize("));
        assert!(content.ends_with("export default EmailSenderService;\n"));
    }
}
