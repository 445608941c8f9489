//! CLI command modules

pub mod analyze;
pub mod batch;
pub mod init;
pub mod migrate;
