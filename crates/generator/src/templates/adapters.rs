//! `adapters.ts`: platform detection shim or a multi-platform adapter set

use capsule_parser::Platform;

use crate::context::TemplateContext;
use crate::error::TemplateError;
use crate::naming::quote;
use crate::platform::{adapter_class, detection_expression, selection_order, PlatformCapabilities};
use crate::templates::file_header;

const GLOBALS: &str = "const g = globalThis as unknown as Record<string, unknown>;\n";

pub fn render(ctx: &TemplateContext) -> Result<String, TemplateError> {
    let mut content = file_header(ctx, "Platform adapters");
    if ctx.is_multi_platform {
        render_multi_platform(ctx, &mut content);
    } else {
        render_single_platform(ctx, &mut content);
    }
    Ok(content)
}

fn render_single_platform(ctx: &TemplateContext, content: &mut String) {
    let platform = ctx.primary_platform();
    let capabilities = PlatformCapabilities::for_platform(platform);

    content.push_str("import type { Platform, PlatformCapabilities } from './types';\n\n");
    content.push_str(&format!(
        "export const PLATFORM: Platform = {};\n\n",
        quote(platform.as_str())
    ));
    content.push_str(&format!(
        "export const CAPABILITIES: PlatformCapabilities = {};\n\n",
        capabilities.to_ts_literal("")
    ));

    content.push_str("/** True when the current runtime looks like the target platform */\n");
    content.push_str("export function isPlatformSupported(): boolean {\n");
    content.push_str(&format!("  {GLOBALS}"));
    content.push_str(&format!("  return {};\n", detection_expression(platform)));
    content.push_str("}\n\n");

    content.push_str("export function detectPlatform(): Platform {\n");
    content.push_str("  return PLATFORM;\n");
    content.push_str("}\n\n");

    content.push_str("export function getCapabilities(): PlatformCapabilities {\n");
    content.push_str("  return CAPABILITIES;\n");
    content.push_str("}\n");
}

fn render_multi_platform(ctx: &TemplateContext, content: &mut String) {
    let order = selection_order(&ctx.metadata.platforms);

    content.push_str("import type { Platform, PlatformCapabilities } from './types';\n\n");
    content.push_str("export type LogLevel = 'debug' | 'info' | 'warn' | 'error';\n\n");

    content.push_str("export interface PlatformAdapter {\n");
    content.push_str("  readonly platform: Platform;\n");
    content.push_str("  readonly capabilities: PlatformCapabilities;\n");
    content.push_str("  isAvailable(): boolean;\n");
    content.push_str("  now(): number;\n");
    content.push_str("  log(level: LogLevel, message: string): void;\n");
    content.push_str("}\n");

    for platform in &order {
        render_adapter(*platform, content);
    }

    content.push_str("\n/** Adapters in detection order; the universal fallback is always last */\n");
    content.push_str("const ADAPTERS: ReadonlyArray<() => PlatformAdapter> = [\n");
    for platform in &order {
        content.push_str(&format!("  () => new {}(),\n", adapter_class(*platform)));
    }
    content.push_str("];\n\n");

    content.push_str("export function selectAdapter(preferred?: Platform): PlatformAdapter {\n");
    content.push_str("  const adapters = ADAPTERS.map((create) => create());\n");
    content.push_str("  if (preferred !== undefined) {\n");
    content.push_str("    const match = adapters.find((adapter) => adapter.platform === preferred);\n");
    content.push_str("    if (match !== undefined) {\n");
    content.push_str("      return match;\n");
    content.push_str("    }\n");
    content.push_str("  }\n");
    content.push_str("  for (const adapter of adapters) {\n");
    content.push_str("    if (adapter.isAvailable()) {\n");
    content.push_str("      return adapter;\n");
    content.push_str("    }\n");
    content.push_str("  }\n");
    content.push_str("  return new UniversalAdapter();\n");
    content.push_str("}\n\n");

    content.push_str("export function detectPlatform(): Platform {\n");
    content.push_str("  return selectAdapter().platform;\n");
    content.push_str("}\n\n");

    content.push_str("export function getCapabilities(): PlatformCapabilities {\n");
    content.push_str("  return selectAdapter().capabilities;\n");
    content.push_str("}\n");
}

fn render_adapter(platform: Platform, content: &mut String) {
    let capabilities = PlatformCapabilities::for_platform(platform);
    let class = adapter_class(platform);

    content.push_str(&format!("\nexport class {class} implements PlatformAdapter {{\n"));
    content.push_str(&format!(
        "  readonly platform: Platform = {};\n",
        quote(platform.as_str())
    ));
    content.push_str(&format!(
        "  readonly capabilities: PlatformCapabilities = {};\n\n",
        capabilities.to_ts_literal("  ")
    ));

    content.push_str("  isAvailable(): boolean {\n");
    if platform == Platform::Universal {
        content.push_str("    return true;\n");
    } else {
        content.push_str(&format!("    {GLOBALS}"));
        content.push_str(&format!("    return {};\n", detection_expression(platform)));
    }
    content.push_str("  }\n\n");

    content.push_str("  now(): number {\n");
    content.push_str("    return Date.now();\n");
    content.push_str("  }\n\n");

    content.push_str("  log(level: LogLevel, message: string): void {\n");
    content.push_str(&format!(
        "    console[level](`[${{new Date().toISOString()}}] [{}] ${{message}}`);\n",
        platform.as_str()
    ));
    content.push_str("  }\n");
    content.push_str("}\n");
}
