//! Catalog Migration Engine
//!
//! Pure in-memory transformation of parsed catalog documents between
//! schema versions. The engine consumes a `serde_json::Value` tree and
//! returns a migrated tree; reading, writing, and path handling belong to
//! the [`crate::batch`] collaborator.
//!
//! Control flow runs top-down (catalog → type-group → item → classifier +
//! transformers); data flows back up as migrated sections are assembled.

pub mod catalog;
pub mod item;
pub mod report;
pub mod rules;
pub mod transform;
pub mod type_group;

pub use catalog::{
    CatalogMigrator, DocumentStatus, MigratedDocument, MigrationError, MigrationTarget,
    TARGET_VERSION,
};
pub use report::MigrationReport;
pub use rules::{CatalogKind, FieldScope, RuleSet, ScopeLevel, Section};
