//! `service.ts`: the capsule service and its lifecycle state machine
//!
//! States run `uninitialized -> initializing -> ready <-> executing -> error`,
//! with `cleanup()` returning to `uninitialized`. A failed `execute()` sets
//! `error` and then the `finally` block puts the service back to `ready`.
//! The lifecycle check in the validator matches this text, so the transition
//! is emitted exactly as is.

use crate::context::TemplateContext;
use crate::error::TemplateError;
use crate::templates::{ensure_identifier, file_header};

pub fn render(ctx: &TemplateContext) -> Result<String, TemplateError> {
    let service = ctx.service_name();
    let config = ctx.config_name();
    let base_error = ctx.base_error_name();
    ensure_identifier(&service, "service class")?;

    let mut content = file_header(ctx, "Service");

    content.push_str(&format!(
        "import type {{ {config}, OperationResult, PlatformCapabilities, ServiceState }} from './types';\n"
    ));
    content.push_str(&format!(
        "import {{ {base_error}, ExecutionError, InitializationError, to{base_error} }} from './errors';\n"
    ));
    content.push_str("import { DEFAULT_CONFIG } from './constants';\n");
    if ctx.is_multi_platform {
        content.push_str("import { selectAdapter } from './adapters';\n");
        content.push_str("import type { PlatformAdapter } from './adapters';\n\n");
    } else {
        content.push_str("import { getCapabilities } from './adapters';\n\n");
    }

    content.push_str(&format!("/** Lifecycle-managed entry point for {} */\n", ctx.metadata.name));
    content.push_str(&format!("export class {service} {{\n"));
    content.push_str("  private state: ServiceState = 'uninitialized';\n");
    content.push_str(&format!("  private readonly config: {config};\n"));
    content.push_str(&format!("  private lastError?: {base_error};\n"));
    if ctx.is_multi_platform {
        content.push_str("  private adapter?: PlatformAdapter;\n");
    }
    content.push_str("  private capabilities?: PlatformCapabilities;\n\n");

    content.push_str(&format!("  constructor(config: {config} = {{}}) {{\n"));
    content.push_str("    this.config = { ...DEFAULT_CONFIG, ...config };\n");
    content.push_str("  }\n\n");

    // initialize
    content.push_str("  async initialize(): Promise<void> {\n");
    content.push_str("    if (this.state === 'ready') {\n");
    content.push_str("      return;\n");
    content.push_str("    }\n");
    content.push_str("    if (this.state === 'initializing') {\n");
    content.push_str("      throw new InitializationError('Initialization already in progress');\n");
    content.push_str("    }\n");
    content.push_str("    this.state = 'initializing';\n");
    content.push_str("    try {\n");
    if ctx.is_multi_platform {
        content.push_str("      this.adapter = selectAdapter(this.config.platform);\n");
        content.push_str("      this.capabilities = this.adapter.capabilities;\n");
    } else {
        content.push_str("      this.capabilities = getCapabilities();\n");
    }
    content.push_str("      this.state = 'ready';\n");
    content.push_str("    } catch (error) {\n");
    content.push_str("      this.state = 'error';\n");
    content.push_str(&format!("      this.lastError = to{base_error}(error);\n"));
    content.push_str(&format!(
        "      throw new InitializationError(`Failed to initialize {}: ${{this.lastError.message}}`, {{ cause: this.lastError.code }});\n",
        ctx.metadata.name.replace('`', "'")
    ));
    content.push_str("    }\n");
    content.push_str("  }\n\n");

    // execute
    content.push_str("  async execute<T>(operation: () => Promise<T> | T): Promise<OperationResult<T>> {\n");
    content.push_str("    if (this.state !== 'ready') {\n");
    content.push_str("      throw new ExecutionError(`Cannot execute while service is ${this.state}`, { state: this.state });\n");
    content.push_str("    }\n");
    content.push_str("    const started = Date.now();\n");
    content.push_str("    this.state = 'executing';\n");
    content.push_str("    try {\n");
    content.push_str("      const data = await operation();\n");
    content.push_str("      this.state = 'ready';\n");
    content.push_str("      return { success: true, data, duration: Date.now() - started };\n");
    content.push_str("    } catch (error) {\n");
    content.push_str("      this.state = 'error';\n");
    content.push_str(&format!("      this.lastError = to{base_error}(error);\n"));
    content.push_str("      throw this.lastError;\n");
    content.push_str("    } finally {\n");
    content.push_str("      this.state = 'ready';\n");
    content.push_str("    }\n");
    content.push_str("  }\n\n");

    // cleanup
    content.push_str("  async cleanup(): Promise<void> {\n");
    if ctx.is_multi_platform {
        content.push_str("    this.adapter = undefined;\n");
    }
    content.push_str("    this.capabilities = undefined;\n");
    content.push_str("    this.lastError = undefined;\n");
    content.push_str("    this.state = 'uninitialized';\n");
    content.push_str("  }\n\n");

    content.push_str("  getState(): ServiceState {\n");
    content.push_str("    return this.state;\n");
    content.push_str("  }\n\n");

    content.push_str(&format!("  getConfig(): Readonly<{config}> {{\n"));
    content.push_str("    return this.config;\n");
    content.push_str("  }\n\n");

    content.push_str("  getCapabilities(): PlatformCapabilities | undefined {\n");
    content.push_str("    return this.capabilities;\n");
    content.push_str("  }\n\n");

    content.push_str(&format!("  getLastError(): {base_error} | undefined {{\n"));
    content.push_str("    return this.lastError;\n");
    content.push_str("  }\n");
    content.push_str("}\n");

    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::tests::sample_context;
    use capsule_parser::{MigrationMode, Platform};

    #[test]
    fn test_service_lifecycle_members() {
        let ctx = sample_context(vec![Platform::Node], MigrationMode::Auto);
        let content = render(&ctx).unwrap();

        assert!(content.contains("export class EmailSenderService {"));
        assert!(content.contains("  async initialize(): Promise<void> {"));
        assert!(content.contains("  async execute<T>("));
        assert!(content.contains("  async cleanup(): Promise<void> {"));
        assert!(content.contains("  getState(): ServiceState {"));
        assert!(content.contains("this.capabilities = getCapabilities();"));
    }

    #[test]
    fn test_execute_failure_returns_to_ready_in_finally() {
        let ctx = sample_context(vec![Platform::Node, Platform::Web], MigrationMode::Auto);
        let content = render(&ctx).unwrap();

        let error_state = content.find("      this.state = 'error';\n      this.lastError = toEmailSenderError(error);\n      throw this.lastError;").unwrap();
        let finally_ready = content.find("    } finally {\n      this.state = 'ready';").unwrap();
        assert!(error_state < finally_ready);
        assert!(content.contains("this.adapter = selectAdapter(this.config.platform);"));
    }
}
