//! Configuration management for capsule migrations

pub mod batch;
pub mod config;
pub mod generation;
pub mod validation;

#[cfg(test)]
mod tests;

// Re-export main types for convenience
pub use batch::BatchSettings;
pub use config::Config;
pub use generation::{GenerationConfig, OutputConfig};
pub use validation::{DiagnosticsKind, ValidationConfig};
