//! TypeScript capsule analysis
//!
//! Walks a capsule directory, builds a syntax tree per source file and
//! extracts declarations, imports, exports and error classes together with
//! complexity and quality metrics.

pub mod complexity;
pub mod error;
pub mod metadata;
pub mod mode;
pub mod parser;
pub mod types;
pub mod visitor;

pub use error::{ParserError, ParserResult};
pub use mode::{recommend_mode, select_mode, MigrationMode, ModeSelection};
pub use parser::{CapsuleParser, ParserConfig};
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const EMAIL_SENDER: &str = r#"import nodemailer from 'nodemailer';
import { readFile } from 'fs/promises';

/** Outgoing message */
export interface EmailMessage {
  to: string;
  subject: string;
  body?: string;
}

export type Transport = 'smtp' | 'ses';

export class EmailError extends Error {}
export class DeliveryError extends EmailError {}

export const DEFAULT_TRANSPORT: Transport = 'smtp';

export async function send(message: EmailMessage): Promise<boolean> {
  if (!message.to || !message.subject) {
    throw new DeliveryError('missing fields');
  }
  const template = await readFile('template.html', 'utf8');
  return template.length > 0 ? true : false;
}
"#;

    #[tokio::test]
    async fn test_parse_capsule_end_to_end() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("email-sender");
        fs::create_dir_all(dir.join("src")).unwrap();
        fs::write(dir.join("src/index.ts"), EMAIL_SENDER).unwrap();

        let parsed = CapsuleParser::default().parse_capsule(&dir).await.unwrap();

        assert_eq!(parsed.metadata.id, "email-sender");
        assert_eq!(parsed.metadata.name, "Email Sender");
        assert_eq!(parsed.metadata.category, "email");
        assert_eq!(parsed.metadata.platforms, vec![Platform::Node]);
        assert_eq!(parsed.metadata.dependencies, vec!["nodemailer".to_string()]);

        assert_eq!(parsed.analysis.interfaces.len(), 1);
        assert_eq!(parsed.analysis.types.len(), 1);
        assert_eq!(parsed.analysis.classes.len(), 2);
        assert_eq!(parsed.analysis.errors.len(), 2);
        assert_eq!(parsed.analysis.functions.len(), 1);
        assert_eq!(parsed.analysis.constants.len(), 1);

        // 1 + if + || + ternary
        assert_eq!(parsed.complexity.cyclomatic_complexity, 4);
        assert_eq!(parsed.complexity.files.len(), 1);
        assert!(parsed.complexity.maintainability_index > 0.0);
        assert_eq!(parsed.complexity.estimated_migration_hours, 2.0);

        assert!(parsed.quality.has_types);
        assert!(parsed.quality.has_error_hierarchy);
        assert!(parsed.quality.has_documentation);
        assert!(!parsed.quality.has_tests);

        assert_eq!(recommend_mode(&parsed.complexity), MigrationMode::Auto);
    }

    #[tokio::test]
    async fn test_parse_is_deterministic_across_calls() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("email-sender");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("index.ts"), EMAIL_SENDER).unwrap();
        fs::write(dir.join("extra.ts"), "export const extra = 1;\n").unwrap();

        let parser = CapsuleParser::default();
        let first = parser.parse_capsule(&dir).await.unwrap();
        let second = parser.parse_capsule(&dir).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.analysis.constants[0].name, "extra");
    }
}
