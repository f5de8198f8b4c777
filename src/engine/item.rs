//! Item Migration
//!
//! Migrates a single leaf catalog entry into the five-section target shape:
//! identity fields at the root, plus `attributes`, `stats`, `combat`
//! (enemies only), and `traits` sections. Every raw field is classified
//! into exactly one section; nothing is dropped and nothing is duplicated.
//!
//! Input that is already partially migrated (nested section mappings) is
//! merged rather than re-wrapped, so re-running the migrator is safe.

use serde_json::{json, Map, Value};

use super::report::MigrationReport;
use super::rules::{CatalogKind, FieldScope, RuleSet, Section};
use super::transform;

// ============================================================================
// Defaults
// ============================================================================

/// Scores synthesized for attributes missing from input. Physical scores
/// default higher than mental ones.
pub const ATTRIBUTE_DEFAULTS: &[(&str, i64)] = &[
    ("strength", 10),
    ("dexterity", 10),
    ("constitution", 10),
    ("intelligence", 8),
    ("wisdom", 8),
    ("charisma", 8),
];

/// Combat lists always present on a migrated enemy.
pub const COMBAT_LIST_DEFAULTS: &[&str] = &["abilities", "resistances", "vulnerabilities", "immunities"];

// ============================================================================
// Item Migrator
// ============================================================================

/// Migrates raw item records using a fixed rule-set and catalog kind.
#[derive(Debug, Clone, Copy)]
pub struct ItemMigrator<'a> {
    rules: &'a RuleSet,
    kind: CatalogKind,
}

impl<'a> ItemMigrator<'a> {
    pub fn new(rules: &'a RuleSet, kind: CatalogKind) -> Self {
        Self { rules, kind }
    }

    /// Migrate one raw item record into the target shape.
    ///
    /// Pure apart from warnings pushed onto the report. Malformed nested
    /// structures are carried through unmodified with a warning; a single
    /// bad field never aborts the item.
    pub fn migrate(&self, raw: &Map<String, Value>, report: &mut MigrationReport) -> Value {
        let scope = FieldScope::item(self.kind);
        let mut identity = Map::new();
        let mut attributes = Map::new();
        let mut stats = Map::new();
        let mut combat = Map::new();
        let mut traits = Map::new();

        for (key, value) in raw {
            match (key.as_str(), value) {
                // Section containers from partially-migrated input merge
                // into their sections instead of re-wrapping.
                ("attributes", Value::Object(entries)) => {
                    for (name, score) in entries {
                        attributes.insert(name.clone(), transform::attribute_value(name, score, report));
                    }
                }
                ("stats", Value::Object(entries)) => {
                    for (name, stat) in entries {
                        stats.insert(name.clone(), self.stat_value(name, stat, report));
                    }
                }
                ("combat", Value::Object(entries)) if self.kind.is_enemy() => {
                    for (name, entry) in entries {
                        combat.insert(name.clone(), self.combat_value(name, entry, report));
                    }
                }
                ("traits", _) => {
                    self.merge_traits(value, &mut traits, report);
                }
                _ => match self.rules.classify(key, scope) {
                    Section::Identity => {
                        self.insert_identity(raw, key, value, &mut identity, report);
                    }
                    Section::Attribute => {
                        attributes.insert(key.clone(), transform::attribute_value(key, value, report));
                    }
                    Section::Stat => {
                        stats.insert(key.clone(), self.stat_value(key, value, report));
                    }
                    Section::Combat => {
                        combat.insert(key.clone(), self.combat_value(key, value, report));
                    }
                    // Type properties never classify at item level; the
                    // fallback keeps classification total regardless.
                    Section::TypeProperty | Section::Trait => {
                        traits.insert(key.clone(), value.clone());
                    }
                },
            }
        }

        self.derive_rarity(&mut identity);
        self.fill_attribute_defaults(&mut attributes);
        if self.kind.is_enemy() {
            self.fill_combat_defaults(&mut combat);
        }

        let mut item = identity;
        item.insert("attributes".to_string(), Value::Object(attributes));
        item.insert("stats".to_string(), Value::Object(stats));
        if self.kind.is_enemy() {
            item.insert("combat".to_string(), Value::Object(combat));
        }
        item.insert("traits".to_string(), Value::Object(traits));
        Value::Object(item)
    }

    /// Route an identity field, renaming the legacy `selectionWeight`
    /// alias and converting rarity words to numbers.
    fn insert_identity(
        &self,
        raw: &Map<String, Value>,
        key: &str,
        value: &Value,
        identity: &mut Map<String, Value>,
        report: &mut MigrationReport,
    ) {
        match key {
            "selectionWeight" => {
                // The alias only fills the gap when the modern key is absent.
                if !raw.contains_key("rarityWeight") {
                    identity.insert("rarityWeight".to_string(), value.clone());
                }
            }
            "rarity" => {
                identity.insert(key.to_string(), transform::rarity_value(value, report));
            }
            _ => {
                identity.insert(key.to_string(), value.clone());
            }
        }
    }

    fn stat_value(&self, stat: &str, value: &Value, report: &mut MigrationReport) -> Value {
        if stat == "damage" {
            transform::dice_to_range(stat, value, transform::DAMAGE_MODIFIER, report)
        } else {
            transform::stat_to_formula(stat, value)
        }
    }

    fn combat_value(&self, field: &str, value: &Value, report: &mut MigrationReport) -> Value {
        // Unlock schedules keep their keyed shape; the list fields are
        // normalized to sequences.
        if field == "abilityUnlocks" {
            value.clone()
        } else {
            transform::normalize_collection(field, value, report)
        }
    }

    /// Fold a traits container into the traits section. Legacy shapes:
    /// a plain mapping, or a sequence of `{"key": k, "value": v}` pairs.
    fn merge_traits(&self, value: &Value, traits: &mut Map<String, Value>, report: &mut MigrationReport) {
        match value {
            Value::Object(map) => {
                for (key, entry) in map {
                    traits.insert(key.clone(), entry.clone());
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
                        for (key, entry) in pairs {
                            traits.insert(key.to_string(), entry.clone());
                        }
                    }
                    None => {
                        report.add_warning(format!(
                            "traits sequence holds entries without key/value shape, carried unmodified: {value}"
                        ));
                        traits.insert("traits".to_string(), value.clone());
                    }
                }
            }
            _ => {
                report.add_warning(format!(
                    "traits field is neither mapping nor sequence, carried unmodified: {value}"
                ));
                traits.insert("traits".to_string(), value.clone());
            }
        }
    }

    /// Derive the numeric rarity tier from rarityWeight when absent.
    fn derive_rarity(&self, identity: &mut Map<String, Value>) {
        if identity.contains_key("rarity") {
            return;
        }
        if let Some(weight) = identity.get("rarityWeight").and_then(Value::as_i64) {
            identity.insert("rarity".to_string(), json!(transform::rarity_tier_for_weight(weight)));
        }
    }

    fn fill_attribute_defaults(&self, attributes: &mut Map<String, Value>) {
        for (name, score) in ATTRIBUTE_DEFAULTS {
            if !attributes.contains_key(*name) {
                attributes.insert(name.to_string(), json!(score));
            }
        }
    }

    fn fill_combat_defaults(&self, combat: &mut Map<String, Value>) {
        for name in COMBAT_LIST_DEFAULTS {
            if !combat.contains_key(*name) {
                combat.insert(name.to_string(), json!([]));
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
