//! Capsule generation
//!
//! Turns a [`capsule_parser::ParsedCapsule`] into the fixed eight-file capsule
//! layout: types, errors, constants, utils, adapters, service, index and
//! README.

pub mod config;
pub mod context;
pub mod error;
pub mod formatter;
pub mod generator;
pub mod naming;
pub mod platform;
pub mod result;
pub mod templates;

pub use config::GenerationOptions;
pub use context::TemplateContext;
pub use error::{GeneratorError, GeneratorResult, TemplateError};
pub use formatter::{CodeFormatter, WhitespaceFormatter};
pub use generator::CapsuleGenerator;
pub use platform::PlatformCapabilities;
pub use result::{GeneratedFile, GenerationResult};
pub use templates::{required_files, FileKind};
