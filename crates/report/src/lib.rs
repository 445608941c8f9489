//! Migration reports
//!
//! [`Reporter`] joins parse, generation and validation results into
//! [`MigrationReport`]s, reduces them into a [`BatchMigrationReport`] and
//! derives [`ProgressDashboard`] snapshots. [`ReportWriter`] persists them as
//! markdown and JSON.

pub mod error;
pub mod markdown;
pub mod reporter;
pub mod types;
pub mod writer;

pub use error::{ReportError, ReportResult};
pub use markdown::{render_batch_report, render_report};
pub use reporter::{migration_status, progress_dashboard, Reporter};
pub use types::{BatchMigrationReport, CodeSize, MigrationReport, MigrationStatus, ProgressDashboard};
pub use writer::ReportWriter;
