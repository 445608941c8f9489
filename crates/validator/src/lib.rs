//! Validation of generated capsules
//!
//! [`CapsuleValidator`] inspects a capsule directory structurally and through
//! a [`DiagnosticsProvider`], producing a [`ValidationResult`] with a derived
//! quality score.

pub mod checks;
pub mod diagnostics;
pub mod result;
pub mod validator;

pub use diagnostics::{DiagnosticsError, DiagnosticsProvider, SyntaxDiagnostics, TscDiagnostics};
pub use result::{quality_score, Diagnostic, ValidationCheck, ValidationResult};
pub use validator::CapsuleValidator;

#[cfg(test)]
mod tests {
    use super::*;
    use capsule_generator::{CapsuleGenerator, GenerationOptions};
    use capsule_parser::{CapsuleParser, MigrationMode, ParserConfig};
    use chrono::TimeZone;
    use tempfile::TempDir;

    const SOURCE: &str = r#"import { createTransport } from 'nodemailer';

export interface Message {
  to: string;
  subject: string;
}

export class SendError extends Error {}

export async function send(message: Message): Promise<boolean> {
  if (!message.to) {
    throw new SendError('missing recipient');
  }
  const transport = createTransport({});
  await transport.sendMail(message);
  return true;
}
"#;

    #[tokio::test]
    async fn test_generated_capsule_validates() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("mailer");
        std::fs::create_dir_all(&input).unwrap();
        std::fs::write(input.join("index.ts"), SOURCE).unwrap();

        let parsed = CapsuleParser::new(ParserConfig::default())
            .parse_capsule(&input)
            .await
            .unwrap();
        let output = temp_dir.path().join("out");
        let generated_at = chrono::Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let generation = CapsuleGenerator::new(GenerationOptions::default().with_generated_at(generated_at))
            .generate(&parsed, &output, MigrationMode::Auto)
            .await
            .unwrap();
        assert!(generation.success);

        let result = CapsuleValidator::syntax_only().validate(&output).await;
        assert!(result.is_valid, "{:?} {:?}", result.errors, result.diagnostics);
        assert!(result.warnings.is_empty(), "{:?}", result.warnings);
        assert_eq!(result.checks.len(), 7);
        assert_eq!(result.quality_score, 100.0);
    }

    #[tokio::test]
    async fn test_deleting_a_file_fails_validation() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("mailer");
        std::fs::create_dir_all(&input).unwrap();
        std::fs::write(input.join("index.ts"), SOURCE).unwrap();

        let parsed = CapsuleParser::new(ParserConfig::default())
            .parse_capsule(&input)
            .await
            .unwrap();
        let output = temp_dir.path().join("out");
        CapsuleGenerator::default()
            .generate(&parsed, &output, MigrationMode::Semi)
            .await
            .unwrap();
        std::fs::remove_file(output.join("README.md")).unwrap();

        let result = CapsuleValidator::syntax_only().validate(&output).await;
        assert!(!result.is_valid);
        assert!(!result.check("required_files").unwrap().passed);
        assert!(!result.check("readme_sections").unwrap().passed);
        assert!(result.check("service_lifecycle").unwrap().passed);
        assert!(result.quality_score < 100.0);
    }

    const CROSS_REFERENCES: &str = r#"import { createTransport } from 'nodemailer';

export type Transport = 'smtp' | 'ses';

export enum Priority {
  Low,
  High,
}

export const DEFAULT_TRANSPORT: Transport = 'smtp';

let sent = 0;

export interface Message {
  to: string;
  subject: string;
  priority?: Priority;
}

export class SendError extends Error {
  constructor(readonly transport: Transport = DEFAULT_TRANSPORT) {
    super('send failed');
  }
}

export async function send(message: Message): Promise<number> {
  if (!message.to) {
    throw new SendError();
  }
  const transport = createTransport({ transport: DEFAULT_TRANSPORT });
  await transport.sendMail(message);
  sent += message.priority === Priority.High ? 2 : 1;
  return sent;
}
"#;

    #[tokio::test]
    async fn test_generated_capsule_type_checks_with_tsc() {
        let Ok(tsc) = which::which("tsc") else {
            eprintln!("tsc not on PATH; skipping type check");
            return;
        };

        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("mailer");
        std::fs::create_dir_all(&input).unwrap();
        std::fs::write(input.join("index.ts"), CROSS_REFERENCES).unwrap();

        let parsed = CapsuleParser::new(ParserConfig::default())
            .parse_capsule(&input)
            .await
            .unwrap();
        let output = temp_dir.path().join("out");
        CapsuleGenerator::default()
            .generate(&parsed, &output, MigrationMode::Auto)
            .await
            .unwrap();

        let result = CapsuleValidator::with_provider(Box::new(TscDiagnostics::new(Some(tsc))))
            .validate(&output)
            .await;
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
        assert!(result.is_valid, "{:?}", result.errors);
        assert_eq!(result.quality_score, 100.0);
    }
}
