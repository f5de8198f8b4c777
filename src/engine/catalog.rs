//! Catalog Migration
//!
//! Top-level orchestrator: stamps document metadata, finds every
//! type-collection (keys suffixed `_types`), and migrates each type-group
//! inside it. Unrecognized top-level keys pass through verbatim; the
//! migrator never silently deletes document content.
//!
//! A document already stamped with the target version is returned deeply
//! unchanged (idempotency guard).

use serde_json::{json, Map, Value};
use thiserror::Error;
use tracing::{debug, info};

use super::report::MigrationReport;
use super::rules::{CatalogKind, RuleSet};
use super::type_group::TypeGroupMigrator;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Error, Debug)]
pub enum MigrationError {
    #[error("document root is not a JSON object")]
    NotAnObject,
}

pub type Result<T> = std::result::Result<T, MigrationError>;

// ============================================================================
// Migration Target
// ============================================================================

/// Version stamp written by the current rule-set.
pub const TARGET_VERSION: &str = "5.1";

/// Key suffix marking a mapping of type-group names to type-groups.
pub const TYPE_COLLECTION_SUFFIX: &str = "_types";

/// Canonical suffix for the document-type tag.
pub const TYPE_TAG_SUFFIX: &str = "_catalog";

/// Values stamped into migrated document metadata.
#[derive(Debug, Clone)]
pub struct MigrationTarget {
    /// Schema version written to `metadata.version`.
    pub version: String,
    /// Date stamp written to `metadata.lastUpdated`.
    pub last_updated: String,
}

impl MigrationTarget {
    pub fn new(version: impl Into<String>, last_updated: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            last_updated: last_updated.into(),
        }
    }

    /// Target for the v5.1 schema with a caller-supplied date stamp.
    pub fn v5_1(last_updated: impl Into<String>) -> Self {
        Self::new(TARGET_VERSION, last_updated)
    }
}

// ============================================================================
// Outcome
// ============================================================================

/// How a document left the migrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentStatus {
    /// Rewritten to the target schema.
    Migrated,
    /// Already stamped with the target version; returned unchanged.
    AlreadyCurrent,
}

/// A migrated document plus its status.
#[derive(Debug, Clone)]
pub struct MigratedDocument {
    pub document: Value,
    pub status: DocumentStatus,
}

// ============================================================================
// Catalog Migrator
// ============================================================================

/// Migrates whole catalog documents using a fixed rule-set and target.
#[derive(Debug, Clone)]
pub struct CatalogMigrator<'a> {
    rules: &'a RuleSet,
    target: MigrationTarget,
}

impl<'a> CatalogMigrator<'a> {
    pub fn new(rules: &'a RuleSet, target: MigrationTarget) -> Self {
        Self { rules, target }
    }

    /// Migrate one parsed catalog document.
    ///
    /// The kind flag tells the engine whether the document is an enemy
    /// catalog (combat sections) or an item catalog.
    pub fn migrate_document(
        &self,
        document: &Value,
        kind: CatalogKind,
        report: &mut MigrationReport,
    ) -> Result<MigratedDocument> {
        let root = document.as_object().ok_or(MigrationError::NotAnObject)?;

        if self.document_version(root) == Some(self.target.version.as_str()) {
            debug!(version = %self.target.version, "document already at target version");
            report.record_skipped();
            return Ok(MigratedDocument {
                document: document.clone(),
                status: DocumentStatus::AlreadyCurrent,
            });
        }

        let mut result = Map::new();
        result.insert(
            "metadata".to_string(),
            self.migrate_metadata(root.get("metadata"), report),
        );

        let groups = TypeGroupMigrator::new(self.rules, kind);
        for (key, value) in root {
            if key == "metadata" {
                continue;
            }
            if key.ends_with(TYPE_COLLECTION_SUFFIX) {
                match value.as_object() {
                    Some(collection) => {
                        let mut migrated = Map::new();
                        for (name, group) in collection {
                            migrated.insert(name.clone(), groups.migrate(name, group, report));
                        }
                        info!(collection = %key, groups = migrated.len(), "migrated type collection");
                        result.insert(key.clone(), Value::Object(migrated));
                        continue;
                    }
                    None => {
                        report.add_warning(format!(
                            "type collection '{key}' is not a mapping, carried unmodified"
                        ));
                    }
                }
            }
            // Everything unrecognized passes through verbatim.
            result.insert(key.clone(), value.clone());
        }

        report.record_migrated();
        Ok(MigratedDocument {
            document: Value::Object(result),
            status: DocumentStatus::Migrated,
        })
    }

    fn document_version<'b>(&self, root: &'b Map<String, Value>) -> Option<&'b str> {
        root.get("metadata")?.get("version")?.as_str()
    }

    /// Copy metadata with version, date stamp, and canonical type tag.
    /// Missing metadata is synthesized so the output is always stamped.
    fn migrate_metadata(&self, metadata: Option<&Value>, report: &mut MigrationReport) -> Value {
        let mut result = match metadata {
            Some(Value::Object(entries)) => entries.clone(),
            Some(other) => {
                report.add_warning(format!(
                    "metadata is not a mapping, replacing with a stamped section (was: {other})"
                ));
                Map::new()
            }
            None => {
                report.add_warning("document has no metadata section, synthesizing one");
                Map::new()
            }
        };

        result.insert("version".to_string(), json!(self.target.version));
        result.insert("lastUpdated".to_string(), json!(self.target.last_updated));
        if let Some(tag) = result.get("type").and_then(Value::as_str) {
            result.insert("type".to_string(), json!(canonical_type_tag(tag)));
        }
        Value::Object(result)
    }
}

/// Normalize a document-type tag to the canonical `_catalog` suffix form.
fn canonical_type_tag(tag: &str) -> String {
    let tag = tag.trim().replace(' ', "_");
    if tag.ends_with(TYPE_TAG_SUFFIX) {
        tag
    } else {
        format!("{tag}{TYPE_TAG_SUFFIX}")
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn migrator() -> CatalogMigrator<'static> {
        CatalogMigrator::new(RuleSet::v5(), MigrationTarget::v5_1("2026-08-07"))
    }

    fn sample_catalog() -> Value {
        json!({
            "metadata": {
                "version": "4.0",
                "type": "enemy",
                "lastUpdated": "2024-02-11",
                "description": "Wolf enemy catalog"
            },
            "enemy_types": {
                "wolves": {
                    "habitat": "forest",
                    "items": [{"slug": "wolf-alpha", "health": 50}]
                }
            },
            "spawnRules": {"biome": "forest"}
        })
    }

    #[test]
    fn test_migrates_metadata_stamp() {
        let mut report = MigrationReport::new();
        let outcome = migrator()
            .migrate_document(&sample_catalog(), CatalogKind::Enemy, &mut report)
            .expect("migration succeeds");

        assert_eq!(outcome.status, DocumentStatus::Migrated);
        let metadata = &outcome.document["metadata"];
        assert_eq!(metadata["version"], json!("5.1"));
        assert_eq!(metadata["lastUpdated"], json!("2026-08-07"));
        assert_eq!(metadata["type"], json!("enemy_catalog"));
        assert_eq!(metadata["description"], json!("Wolf enemy catalog"));
        assert_eq!(report.migrated_count, 1);
    }

    #[test]
    fn test_type_collections_migrated() {
        let mut report = MigrationReport::new();
        let outcome = migrator()
            .migrate_document(&sample_catalog(), CatalogKind::Enemy, &mut report)
            .expect("migration succeeds");

        let wolves = &outcome.document["enemy_types"]["wolves"];
        assert_eq!(wolves["properties"]["habitat"], json!("forest"));
        assert_eq!(
            wolves["items"][0]["stats"]["health"],
            json!("constitution_mod * 2 + level * 5 + 50")
        );
    }

    #[test]
    fn test_unrecognized_keys_pass_through() {
        let mut report = MigrationReport::new();
        let outcome = migrator()
            .migrate_document(&sample_catalog(), CatalogKind::Enemy, &mut report)
            .expect("migration succeeds");

        assert_eq!(outcome.document["spawnRules"], json!({"biome": "forest"}));
    }

    #[test]
    fn test_idempotency_guard() {
        let mut report = MigrationReport::new();
        let first = migrator()
            .migrate_document(&sample_catalog(), CatalogKind::Enemy, &mut report)
            .expect("first migration succeeds");

        let second = migrator()
            .migrate_document(&first.document, CatalogKind::Enemy, &mut report)
            .expect("second migration succeeds");

        assert_eq!(second.status, DocumentStatus::AlreadyCurrent);
        assert_eq!(second.document, first.document);
        assert_eq!(report.migrated_count, 1);
        assert_eq!(report.skipped_count, 1);
    }

    #[test]
    fn test_non_object_document_rejected() {
        let mut report = MigrationReport::new();
        let result = migrator().migrate_document(&json!([1, 2, 3]), CatalogKind::Enemy, &mut report);
        assert!(matches!(result, Err(MigrationError::NotAnObject)));
    }

    #[test]
    fn test_missing_metadata_synthesized() {
        let mut report = MigrationReport::new();
        let outcome = migrator()
            .migrate_document(&json!({"enemy_types": {}}), CatalogKind::Enemy, &mut report)
            .expect("migration succeeds");

        assert_eq!(outcome.document["metadata"]["version"], json!("5.1"));
        assert!(report.has_warnings());
    }

    #[test]
    fn test_non_mapping_type_collection_is_anomaly() {
        let mut report = MigrationReport::new();
        let doc = json!({
            "metadata": {"version": "4.0"},
            "enemy_types": ["not", "a", "mapping"]
        });
        let outcome = migrator()
            .migrate_document(&doc, CatalogKind::Enemy, &mut report)
            .expect("migration succeeds");

        assert_eq!(outcome.document["enemy_types"], json!(["not", "a", "mapping"]));
        assert!(report.has_warnings());
    }

    #[test]
    fn test_canonical_type_tag() {
        assert_eq!(canonical_type_tag("enemy"), "enemy_catalog");
        assert_eq!(canonical_type_tag("enemy_catalog"), "enemy_catalog");
        assert_eq!(canonical_type_tag("item catalog"), "item_catalog");
    }
}
