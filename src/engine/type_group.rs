//! Type-Group Migration
//!
//! A type-group is one subtype of a catalog ("wolves", "heavy-blades"):
//! type-level descriptive properties plus the items sharing them. Legacy
//! schemas scattered those properties between direct fields and a nested
//! per-type `traits` mapping; the target schema gathers them under one
//! `properties` mapping, with direct fields winning on conflict.
//!
//! Items are migrated independently and in order; there is no cross-item
//! state.

use serde_json::{Map, Value};

use super::item::ItemMigrator;
use super::report::MigrationReport;
use super::rules::{CatalogKind, RuleSet};

// ============================================================================
// Type-Group Migrator
// ============================================================================

/// Migrates one type-group record.
#[derive(Debug, Clone, Copy)]
pub struct TypeGroupMigrator<'a> {
    rules: &'a RuleSet,
    kind: CatalogKind,
}

impl<'a> TypeGroupMigrator<'a> {
    pub fn new(rules: &'a RuleSet, kind: CatalogKind) -> Self {
        Self { rules, kind }
    }

    /// Migrate a raw type-group into `{properties, items}` form.
    ///
    /// A non-object group is a structural anomaly: returned unmodified
    /// with a warning rather than recursed into blindly.
    pub fn migrate(&self, name: &str, raw: &Value, report: &mut MigrationReport) -> Value {
        let group = match raw.as_object() {
            Some(group) => group,
            None => {
                report.add_warning(format!(
                    "type-group '{name}' is not a mapping, carried unmodified"
                ));
                return raw.clone();
            }
        };

        let mut result = Map::new();
        let mut properties = Map::new();

        // Legacy nested traits first, so direct fields override on conflict.
        if let Some(traits) = group.get("traits") {
            self.extract_legacy_traits(name, traits, &mut properties, &mut result, report);
        }
        for (key, value) in group {
            if key == "items" || key == "traits" {
                continue;
            }
            properties.insert(key.clone(), value.clone());
        }

        result.insert("properties".to_string(), Value::Object(properties));
        result.insert("items".to_string(), self.migrate_items(name, group.get("items"), report));
        Value::Object(result)
    }

    /// Pull type-level fields out of a legacy traits container: either a
    /// plain mapping or a sequence of `{"key": k, "value": v}` pairs.
    fn extract_legacy_traits(
        &self,
        name: &str,
        traits: &Value,
        properties: &mut Map<String, Value>,
        result: &mut Map<String, Value>,
        report: &mut MigrationReport,
    ) {
        match traits {
            Value::Object(entries) => {
                for (key, value) in entries {
                    properties.insert(key.clone(), value.clone());
                }
            }
            Value::Array(entries) => {
                let pairs: Option<Vec<(&str, &Value)>> = entries
                    .iter()
                    .map(|entry| {
                        let pair = entry.as_object()?;
                        Some((pair.get("key")?.as_str()?, pair.get("value")?))
                    })
                    .collect();
                match pairs {
                    Some(pairs) => {
                        for (key, value) in pairs {
                            properties.insert(key.to_string(), value.clone());
                        }
                    }
                    None => {
                        report.add_warning(format!(
                            "type-group '{name}' traits sequence is not key/value pairs, carried unmodified"
                        ));
                        result.insert("traits".to_string(), traits.clone());
                    }
                }
            }
            _ => {
                report.add_warning(format!(
                    "type-group '{name}' traits is neither mapping nor sequence, carried unmodified"
                ));
                result.insert("traits".to_string(), traits.clone());
            }
        }
    }

    fn migrate_items(&self, name: &str, items: Option<&Value>, report: &mut MigrationReport) -> Value {
        let migrator = ItemMigrator::new(self.rules, self.kind);
        match items {
            Some(Value::Array(entries)) => Value::Array(
                entries
                    .iter()
                    .map(|entry| match entry.as_object() {
                        Some(item) => migrator.migrate(item, report),
                        None => {
                            report.add_warning(format!(
                                "type-group '{name}' holds a non-mapping item, carried unmodified"
                            ));
                            entry.clone()
                        }
                    })
                    .collect(),
            ),
            Some(other) => {
                report.add_warning(format!(
                    "type-group '{name}' items is not a sequence, carried unmodified"
                ));
                other.clone()
            }
            None => Value::Array(Vec::new()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn migrate(kind: CatalogKind, value: Value) -> (Value, MigrationReport) {
        let mut report = MigrationReport::new();
        let migrator = TypeGroupMigrator::new(RuleSet::v5(), kind);
        let group = migrator.migrate("wolves", &value, &mut report);
        (group, report)
    }

    #[test]
    fn test_properties_from_direct_fields() {
        let (group, report) = migrate(
            CatalogKind::Enemy,
            json!({
                "category": "beast",
                "habitat": "forest",
                "items": []
            }),
        );

        assert_eq!(group["properties"]["category"], json!("beast"));
        assert_eq!(group["properties"]["habitat"], json!("forest"));
        assert_eq!(group["items"], json!([]));
        assert!(!report.has_warnings());
    }

    #[test]
    fn test_properties_from_legacy_traits_mapping() {
        let (group, _) = migrate(
            CatalogKind::Enemy,
            json!({
                "traits": {"size": "medium", "behavior": "pack"},
                "items": []
            }),
        );

        assert_eq!(group["properties"]["size"], json!("medium"));
        assert_eq!(group["properties"]["behavior"], json!("pack"));
        assert_eq!(group.get("traits"), None);
    }

    #[test]
    fn test_direct_fields_win_over_legacy_traits() {
        let (group, _) = migrate(
            CatalogKind::Enemy,
            json!({
                "size": "large",
                "traits": {"size": "medium"},
                "items": []
            }),
        );

        assert_eq!(group["properties"]["size"], json!("large"));
    }

    #[test]
    fn test_legacy_trait_pair_array_extracts() {
        let (group, _) = migrate(
            CatalogKind::Enemy,
            json!({
                "traits": [{"key": "habitat", "value": "tundra"}],
                "items": []
            }),
        );

        assert_eq!(group["properties"]["habitat"], json!("tundra"));
    }

    #[test]
    fn test_items_migrated_in_order() {
        let (group, _) = migrate(
            CatalogKind::Enemy,
            json!({
                "items": [
                    {"slug": "wolf-pup"},
                    {"slug": "wolf-alpha"},
                    {"slug": "wolf-elder"}
                ]
            }),
        );

        let items = group["items"].as_array().expect("items array");
        let slugs: Vec<&str> = items
            .iter()
            .map(|item| item["slug"].as_str().expect("slug"))
            .collect();
        assert_eq!(slugs, vec!["wolf-pup", "wolf-alpha", "wolf-elder"]);
        // Each came back in migrated shape.
        assert!(items[0]["attributes"].is_object());
    }

    #[test]
    fn test_missing_items_becomes_empty_sequence() {
        let (group, _) = migrate(CatalogKind::Enemy, json!({"category": "beast"}));
        assert_eq!(group["items"], json!([]));
    }

    #[test]
    fn test_non_sequence_items_is_anomaly() {
        let (group, report) = migrate(
            CatalogKind::Enemy,
            json!({"items": {"wolf": {}}}),
        );

        assert_eq!(group["items"], json!({"wolf": {}}));
        assert!(report.has_warnings());
    }

    #[test]
    fn test_non_mapping_group_is_anomaly() {
        let (group, report) = migrate(CatalogKind::Enemy, json!(["not", "a", "group"]));

        assert_eq!(group, json!(["not", "a", "group"]));
        assert!(report.has_warnings());
    }

    #[test]
    fn test_scalar_traits_carried_with_warning() {
        let (group, report) = migrate(
            CatalogKind::Enemy,
            json!({"traits": "feral", "items": []}),
        );

        assert_eq!(group["traits"], json!("feral"));
        assert!(report.has_warnings());
    }
}
