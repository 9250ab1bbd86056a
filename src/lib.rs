// src/lib.rs
pub use classify::{ClassificationEntry, classify};
pub use config::{LEGACY_RESOURCE_TYPE, MigrateOptions};
pub use decoder::decode;
pub use engine::{Migration, MigrationEngine};
pub use error::{DecodeError, MigrateError};
pub use files::{FileOutcome, MigrationReport, migrate_dir, migrate_file, migrate_path};
pub use format::format;
pub use policy::SelectionPolicy;
pub use types::*;

mod classify;
mod config;
mod decoder;
mod document;
mod engine;
mod error;
mod files;
mod format;
mod policy;
mod rules;
mod types;

#[cfg(test)]
mod tests;
