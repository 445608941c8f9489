//! `utils.ts`: generic helpers plus the original functions and classes

use capsule_parser::{MigrationMode, ParamInfo};
use std::collections::BTreeSet;

use crate::context::TemplateContext;
use crate::error::TemplateError;
use crate::templates::{
    doc_comment, exported, external_imports, file_header, identifiers, skipped_comments,
    FileKind, SiblingImports,
};

const HELPERS: &str = r#"export function sleep(ms: number): Promise<void> {
  return new Promise((resolve) => setTimeout(resolve, ms));
}

/** Reject with a TimeoutError when `promise` does not settle within `ms` */
export async function withTimeout<T>(promise: Promise<T>, ms: number, operation = 'operation'): Promise<T> {
  let timer: ReturnType<typeof setTimeout> | undefined;
  const timeout = new Promise<never>((_, reject) => {
    timer = setTimeout(() => reject(new TimeoutError(`${operation} timed out after ${ms}ms`, { timeoutMs: ms })), ms);
  });
  try {
    return await Promise.race([promise, timeout]);
  } finally {
    if (timer !== undefined) {
      clearTimeout(timer);
    }
  }
}

/** Run `fn` until it succeeds, backing off linearly between attempts */
export async function retry<T>(
  fn: () => Promise<T>,
  attempts: number = DEFAULT_RETRY_ATTEMPTS,
  delayMs: number = DEFAULT_RETRY_DELAY_MS,
): Promise<T> {
  let lastError: unknown;
  for (let attempt = 1; attempt <= attempts; attempt++) {
    try {
      return await fn();
    } catch (error) {
      lastError = error;
      if (attempt < attempts) {
        await sleep(delayMs * attempt);
      }
    }
  }
  throw lastError;
}

export function isPlainObject(value: unknown): value is Record<string, unknown> {
  return typeof value === 'object' && value !== null && !Array.isArray(value);
}

export function deepMerge<T extends Record<string, unknown>>(target: T, source: Partial<T>): T {
  const result: Record<string, unknown> = { ...target };
  for (const [key, value] of Object.entries(source)) {
    const existing = result[key];
    result[key] = isPlainObject(existing) && isPlainObject(value) ? deepMerge(existing, value) : value;
  }
  return result as T;
}

export function formatDuration(ms: number): string {
  if (ms < 1000) {
    return `${ms}ms`;
  }
  if (ms < 60000) {
    return `${(ms / 1000).toFixed(1)}s`;
  }
  return `${Math.floor(ms / 60000)}m ${Math.round((ms % 60000) / 1000)}s`;
}
"#;

pub fn render(ctx: &TemplateContext) -> Result<String, TemplateError> {
    let preserved = &ctx.preserved;
    let carries_code = ctx.mode != MigrationMode::Manual;

    let tokens: BTreeSet<&str> = if carries_code {
        preserved
            .variables
            .iter()
            .map(|v| v.source_text.as_str())
            .chain(preserved.functions.iter().map(|f| f.source_text.as_str()))
            .chain(preserved.classes.iter().map(|c| c.source_text.as_str()))
            .flat_map(identifiers)
            .collect()
    } else {
        BTreeSet::new()
    };

    let mut content = file_header(ctx, "Utilities");
    content.push_str(&external_imports(ctx, &tokens));

    let mut imports = SiblingImports::referenced(ctx, FileKind::Utils, &tokens);
    imports.value(FileKind::Errors, "TimeoutError");
    imports.value(FileKind::Constants, "DEFAULT_RETRY_ATTEMPTS");
    imports.value(FileKind::Constants, "DEFAULT_RETRY_DELAY_MS");
    content.push_str(&imports.render());
    content.push('\n');

    content.push_str(HELPERS);

    let has_code = !preserved.functions.is_empty()
        || !preserved.classes.is_empty()
        || !preserved.variables.is_empty();
    if carries_code {
        if !preserved.variables.is_empty() {
            content.push_str("\n// Original module state\n\n");
        }
        for variable in &preserved.variables {
            content.push_str(&doc_comment(variable.docs.as_deref(), ""));
            if variable.exported {
                content.push_str(&exported(&variable.source_text));
            } else {
                content.push_str(variable.source_text.trim());
            }
            content.push('\n');
        }

        if !preserved.functions.is_empty() || !preserved.classes.is_empty() {
            content.push_str("\n// Original functions and classes\n");
        }
        for function in &preserved.functions {
            content.push('\n');
            content.push_str(&doc_comment(function.docs.as_deref(), ""));
            content.push_str(&exported(&function.source_text));
            content.push('\n');
        }
        for class in &preserved.classes {
            content.push('\n');
            content.push_str(&doc_comment(class.docs.as_deref(), ""));
            content.push_str(&exported(&class.source_text));
            content.push('\n');
        }
    } else if has_code {
        content.push_str("\n// Manual migration required; these were not carried over:\n");
        for variable in &preserved.variables {
            content.push_str(&format!(
                "//   state {}  ({}:{})\n",
                variable.source_text.trim(),
                variable.location.file.display(),
                variable.location.line
            ));
        }
        for function in &preserved.functions {
            content.push_str(&format!(
                "//   function {}  ({}:{})\n",
                signature(&function.name, &function.params, function.return_type.as_deref()),
                function.location.file.display(),
                function.location.line
            ));
        }
        for class in &preserved.classes {
            content.push_str(&format!(
                "//   class {} with {} method(s)  ({}:{})\n",
                class.name,
                class.methods.len(),
                class.location.file.display(),
                class.location.line
            ));
        }
    }

    let skipped = skipped_comments(ctx, FileKind::Utils);
    if !skipped.is_empty() {
        content.push('\n');
        content.push_str(&skipped);
    }

    Ok(content)
}

fn signature(name: &str, params: &[ParamInfo], return_type: Option<&str>) -> String {
    let params = params
        .iter()
        .map(|p| {
            let optional = if p.optional { "?" } else { "" };
            match &p.type_text {
                Some(t) => format!("{}{optional}: {t}", p.name),
                None => format!("{}{optional}", p.name),
            }
        })
        .collect::<Vec<_>>()
        .join(", ");
    match return_type {
        Some(r) => format!("{name}({params}): {r}"),
        None => format!("{name}({params})"),
    }
}
