//! Batch Driver
//!
//! The engine's filesystem collaborator: discovers catalog documents in a
//! `<category>/<subtype>/catalog.json` layout, runs each one through the
//! catalog migrator, and writes results in-place or side-by-side. Parse
//! and IO failures are recorded per file; one bad document never stops
//! the batch.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info};
use walkdir::WalkDir;

use crate::engine::{CatalogKind, CatalogMigrator, DocumentStatus, MigrationReport};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Migration(#[from] crate::engine::MigrationError),
}

pub type Result<T> = std::result::Result<T, BatchError>;

// ============================================================================
// Options
// ============================================================================

/// File name identifying a catalog document.
pub const CATALOG_FILENAME: &str = "catalog.json";

/// Suffix appended to the stem for side-by-side output.
pub const OUTPUT_SUFFIX: &str = "_v5";

/// Driver behavior knobs.
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Overwrite catalogs instead of writing side-by-side copies.
    pub in_place: bool,
}

/// Result of a batch run: per-file statuses plus the merged report.
#[derive(Debug, Clone)]
pub struct BatchSummary {
    /// Status of every file attempted, in discovery order.
    pub statuses: IndexMap<PathBuf, DocumentStatus>,
    pub report: MigrationReport,
}

// ============================================================================
// Discovery
// ============================================================================

/// Find every catalog document under the given root, sorted by path.
pub fn discover_catalogs(root: &Path) -> Vec<PathBuf> {
    let mut catalogs: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.file_name() == CATALOG_FILENAME)
        .map(|entry| entry.into_path())
        .collect();
    catalogs.sort();
    catalogs
}

/// Infer the catalog kind from the directory layout, falling back to the
/// document-type tag for files outside the standard tree.
pub fn infer_kind(path: &Path, document: &Value) -> CatalogKind {
    let in_enemies_dir = path
        .components()
        .any(|component| component.as_os_str() == "enemies");
    if in_enemies_dir {
        return CatalogKind::Enemy;
    }

    let tag = document
        .get("metadata")
        .and_then(|metadata| metadata.get("type"))
        .and_then(Value::as_str)
        .unwrap_or_default();
    if tag.starts_with("enemy") {
        CatalogKind::Enemy
    } else {
        CatalogKind::Item
    }
}

// ============================================================================
// Migration
// ============================================================================

/// Migrate a single catalog file.
///
/// Writes only when the document actually changed; already-current
/// documents leave the filesystem untouched.
pub fn migrate_file(
    migrator: &CatalogMigrator,
    path: &Path,
    options: &BatchOptions,
    report: &mut MigrationReport,
) -> Result<DocumentStatus> {
    let text = fs::read_to_string(path)?;
    let document: Value = serde_json::from_str(&text)?;
    let kind = infer_kind(path, &document);

    info!(path = %path.display(), ?kind, "migrating catalog");
    let outcome = migrator.migrate_document(&document, kind, report)?;

    if outcome.status == DocumentStatus::Migrated {
        let output = output_path(path, options);
        write_document(&output, &outcome.document)?;
        info!(path = %output.display(), "wrote migrated catalog");
    }
    Ok(outcome.status)
}

/// Migrate every catalog found under the root.
pub fn run(migrator: &CatalogMigrator, root: &Path, options: &BatchOptions) -> BatchSummary {
    let catalogs = discover_catalogs(root);
    info!(root = %root.display(), count = catalogs.len(), "discovered catalogs");
    run_files(migrator, &catalogs, options)
}

/// Migrate an explicit list of catalog files.
pub fn run_files(migrator: &CatalogMigrator, paths: &[PathBuf], options: &BatchOptions) -> BatchSummary {
    let mut report = MigrationReport::new();
    let mut statuses = IndexMap::new();

    for path in paths {
        match migrate_file(migrator, path, options, &mut report) {
            Ok(status) => {
                statuses.insert(path.clone(), status);
            }
            Err(err) => {
                error!(path = %path.display(), %err, "catalog migration failed");
                report.record_failed();
                report.add_warning(format!("{}: {err}", path.display()));
            }
        }
    }

    BatchSummary { statuses, report }
}

fn output_path(input: &Path, options: &BatchOptions) -> PathBuf {
    if options.in_place {
        return input.to_path_buf();
    }
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = input
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();
    input.with_file_name(format!("{stem}{OUTPUT_SUFFIX}{extension}"))
}

fn write_document(path: &Path, document: &Value) -> Result<()> {
    let mut text = serde_json::to_string_pretty(document)?;
    text.push('\n');
    fs::write(path, text)?;
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_output_path_side_by_side() {
        let options = BatchOptions::default();
        let output = output_path(Path::new("data/enemies/wolves/catalog.json"), &options);
        assert_eq!(output, Path::new("data/enemies/wolves/catalog_v5.json"));
    }

    #[test]
    fn test_output_path_in_place() {
        let options = BatchOptions { in_place: true };
        let output = output_path(Path::new("data/enemies/wolves/catalog.json"), &options);
        assert_eq!(output, Path::new("data/enemies/wolves/catalog.json"));
    }

    #[test]
    fn test_infer_kind_from_path() {
        let doc = json!({});
        assert_eq!(
            infer_kind(Path::new("data/enemies/wolves/catalog.json"), &doc),
            CatalogKind::Enemy
        );
        assert_eq!(
            infer_kind(Path::new("data/items/weapons/catalog.json"), &doc),
            CatalogKind::Item
        );
    }

    #[test]
    fn test_infer_kind_from_metadata_tag() {
        let enemy = json!({"metadata": {"type": "enemy_catalog"}});
        assert_eq!(
            infer_kind(Path::new("somewhere/catalog.json"), &enemy),
            CatalogKind::Enemy
        );

        let item = json!({"metadata": {"type": "item_catalog"}});
        assert_eq!(
            infer_kind(Path::new("somewhere/catalog.json"), &item),
            CatalogKind::Item
        );
    }
}
