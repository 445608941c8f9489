//! Capsule migration engine
//!
//! Parses TypeScript capsules, regenerates each into a fixed eight-file
//! service layout, validates the output and reports on it, one capsule at a
//! time or across a batch.

pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod migrator;
pub mod utils;

pub use batch::{BatchConfig, BatchOrchestrator};
pub use config::Config;
pub use error::{MigrationError, MigrationResult};
pub use migrator::CapsuleMigrator;

pub use capsule_generator::{CapsuleGenerator, GenerationOptions, GenerationResult};
pub use capsule_parser::{CapsuleParser, MigrationMode, ParsedCapsule, ParserConfig};
pub use capsule_report::{
    BatchMigrationReport, MigrationReport, MigrationStatus, ProgressDashboard, ReportWriter, Reporter,
};
pub use capsule_validator::{CapsuleValidator, ValidationResult};
