//! File driver: runs the engine over `.tf` files and writes the side outputs.
//!
//! A migrated `main.tf` produces `main_migrated.tf` next to it and, with
//! `csv` enabled, `main_new_resources.csv`. The input file is never modified.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::MigrateOptions;
use crate::engine::MigrationEngine;
use crate::error::MigrateError;
use crate::types::{ProvenanceRecord, provenance_csv};

const MIGRATED_SUFFIX: &str = "_migrated";
const CSV_SUFFIX: &str = "_new_resources";

/// What happened to one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Migrated {
        output: PathBuf,
        csv: Option<PathBuf>,
        resources: Vec<ProvenanceRecord>,
    },
    /// Parsed, but nothing to migrate. No output is written.
    Unchanged,
    /// Matched an ignore pattern, or is not a `.tf` source.
    Ignored,
}

/// Summary of a directory run. A failing file does not stop its siblings.
#[derive(Debug, Default)]
pub struct MigrationReport {
    pub migrated: Vec<(PathBuf, FileOutcome)>,
    pub unchanged: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, MigrateError)>,
}

impl MigrationReport {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    fn record(&mut self, path: PathBuf, result: Result<FileOutcome, MigrateError>) {
        match result {
            Ok(FileOutcome::Ignored) => {}
            Ok(FileOutcome::Unchanged) => self.unchanged.push(path),
            Ok(outcome) => self.migrated.push((path, outcome)),
            Err(err) => self.failed.push((path, err)),
        }
    }
}

/// Migrate a single file, writing `<stem>_migrated.tf` on success.
pub fn migrate_file(
    path: &Path,
    engine: &MigrationEngine,
    options: &MigrateOptions,
) -> Result<FileOutcome, MigrateError> {
    if !is_source(path) || engine.policy().matches_ignored_path(path) {
        debug!(event = "Files", phase = "Ignored", path = %path.display());
        return Ok(FileOutcome::Ignored);
    }

    let source = fs::read_to_string(path).map_err(|err| MigrateError::io(path, err))?;
    let Some(migration) = engine.migrate_str(&source)? else {
        debug!(event = "Files", phase = "Unchanged", path = %path.display());
        return Ok(FileOutcome::Unchanged);
    };

    let output = sibling(path, MIGRATED_SUFFIX, "tf");
    fs::write(&output, &migration.output).map_err(|err| MigrateError::io(&output, err))?;

    let csv = if options.csv {
        let csv = sibling(path, CSV_SUFFIX, "csv");
        fs::write(&csv, provenance_csv(&migration.provenance))
            .map_err(|err| MigrateError::io(&csv, err))?;
        Some(csv)
    } else {
        None
    };

    debug!(
        event = "Files",
        phase = "Written",
        path = %path.display(),
        output = %output.display(),
        resources = migration.provenance.len()
    );

    Ok(FileOutcome::Migrated {
        output,
        csv,
        resources: migration.provenance,
    })
}

/// Migrate the `.tf` files of a directory, in name order.
///
/// Hidden directories are skipped. Subdirectories are entered only when
/// `options.recursive` is set.
pub fn migrate_dir(
    dir: &Path,
    engine: &MigrationEngine,
    options: &MigrateOptions,
) -> Result<MigrationReport, MigrateError> {
    let mut report = MigrationReport::default();
    walk(dir, engine, options, &mut report)?;
    Ok(report)
}

/// Dispatch on whether `path` is a file or a directory.
pub fn migrate_path(
    path: &Path,
    engine: &MigrationEngine,
    options: &MigrateOptions,
) -> Result<MigrationReport, MigrateError> {
    if path.is_dir() {
        return migrate_dir(path, engine, options);
    }
    let mut report = MigrationReport::default();
    report.record(path.to_path_buf(), migrate_file(path, engine, options));
    Ok(report)
}

fn walk(
    dir: &Path,
    engine: &MigrationEngine,
    options: &MigrateOptions,
    report: &mut MigrationReport,
) -> Result<(), MigrateError> {
    if engine.policy().matches_ignored_path(dir) {
        debug!(event = "Files", phase = "Ignored", path = %dir.display());
        return Ok(());
    }

    let mut entries = fs::read_dir(dir)
        .map_err(|err| MigrateError::io(dir, err))?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| MigrateError::io(dir, err))?;
    entries.sort();

    for path in entries {
        if path.is_dir() {
            if options.recursive && !is_hidden(&path) {
                walk(&path, engine, options, report)?;
            }
            continue;
        }
        let result = migrate_file(&path, engine, options);
        report.record(path, result);
    }
    Ok(())
}

/// A `.tf` file that is not itself an earlier output.
fn is_source(path: &Path) -> bool {
    let is_tf = path.extension().is_some_and(|ext| ext == "tf");
    let is_output = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .is_some_and(|stem| stem.ends_with(MIGRATED_SUFFIX));
    is_tf && !is_output
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'))
}

/// `dir/main.tf` -> `dir/main<suffix>.<extension>`
fn sibling(path: &Path, suffix: &str, extension: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_default();
    path.with_file_name(format!("{stem}{suffix}.{extension}"))
}
