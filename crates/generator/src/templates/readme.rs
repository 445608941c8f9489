//! `README.md`: capsule documentation

use crate::context::TemplateContext;
use crate::error::TemplateError;

/// Sections every generated README carries
pub const README_SECTIONS: [&str; 4] = ["## Overview", "## Installation", "## Usage", "## API"];

pub fn render(ctx: &TemplateContext) -> Result<String, TemplateError> {
    let metadata = &ctx.metadata;
    let class = &ctx.class_name;
    let service = ctx.service_name();

    let platforms = metadata
        .platforms
        .iter()
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let mut content = String::new();
    content.push_str(&format!("# {}\n\n", metadata.name));
    content.push_str(&format!("{}\n\n", metadata.description));

    content.push_str("## Overview\n\n");
    content.push_str("| Property | Value |\n");
    content.push_str("|----------|-------|\n");
    content.push_str(&format!("| Capsule ID | `{}` |\n", metadata.id));
    content.push_str(&format!("| Category | {} |\n", metadata.category));
    content.push_str(&format!("| Version | {} |\n", metadata.version));
    content.push_str(&format!("| Platforms | {platforms} |\n"));
    content.push_str(&format!("| Migration mode | {} |\n\n", ctx.mode));

    content.push_str("## Installation\n\n");
    content.push_str("```bash\n");
    content.push_str(&format!("npm install {}\n", ctx.package_name));
    content.push_str("```\n\n");
    if !metadata.dependencies.is_empty() {
        content.push_str("Runtime dependencies:\n\n");
        for dependency in &metadata.dependencies {
            content.push_str(&format!("- `{dependency}`\n"));
        }
        content.push('\n');
    }

    content.push_str("## Usage\n\n");
    content.push_str("```typescript\n");
    content.push_str(&format!(
        "import {{ create{class}AndInitialize }} from '{}';\n\n",
        ctx.package_name
    ));
    content.push_str(&format!(
        "const service = await create{class}AndInitialize({{ timeout: 10000 }});\n"
    ));
    content.push_str("const result = await service.execute(async () => {\n");
    content.push_str("  // capsule work\n");
    content.push_str("  return true;\n");
    content.push_str("});\n");
    content.push_str("await service.cleanup();\n");
    content.push_str("```\n\n");

    content.push_str("## API\n\n");
    content.push_str(&format!("### `{service}`\n\n"));
    content.push_str("| Method | Description |\n");
    content.push_str("|--------|-------------|\n");
    content.push_str("| `initialize()` | Move from `uninitialized` to `ready` |\n");
    content.push_str("| `execute(operation)` | Run an operation; only allowed while `ready` |\n");
    content.push_str("| `cleanup()` | Release resources and return to `uninitialized` |\n");
    content.push_str("| `getState()` | Current lifecycle state |\n\n");

    content.push_str("### Factories\n\n");
    content.push_str(&format!("- `create{class}(config?)`\n"));
    content.push_str(&format!("- `create{class}AndInitialize(config?)`\n\n"));

    content.push_str("### Errors\n\n");
    content.push_str(&format!(
        "Every error extends `{}` and carries an `ErrorCode`.\n\n",
        ctx.base_error_name()
    ));
    for kind in &ctx.error_kinds {
        content.push_str(&format!(
            "- `{}` (`{}`): {}\n",
            kind.class_name, kind.code, kind.description
        ));
    }
    content.push('\n');

    let preserved = ctx.preserved.names();
    if !preserved.is_empty() {
        content.push_str("### Preserved declarations\n\n");
        for name in preserved {
            content.push_str(&format!("- `{name}`\n"));
        }
        content.push('\n');
    }

    content.push_str("## Migration Notes\n\n");
    content.push_str(&format!(
        "- Lines of code: {}\n",
        ctx.complexity.lines_of_code
    ));
    content.push_str(&format!(
        "- Cyclomatic complexity: {}\n",
        ctx.complexity.cyclomatic_complexity
    ));
    content.push_str(&format!(
        "- Maintainability index: {:.1}\n",
        ctx.complexity.maintainability_index
    ));
    content.push_str(&format!(
        "- Estimated migration effort: {:.1}h\n\n",
        ctx.complexity.estimated_migration_hours
    ));

    if ctx.manual_actions.is_empty() {
        content.push_str("No manual actions required.\n");
    } else {
        content.push_str("Manual actions:\n\n");
        for action in &ctx.manual_actions {
            content.push_str(&format!("- [ ] {action}\n"));
        }
    }

    Ok(content)
}
