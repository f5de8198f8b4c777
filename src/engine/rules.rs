//! Field Classification Rules
//!
//! Static rule tables deciding which section of the target schema a raw
//! field belongs to. Classification is a membership test against disjoint
//! per-section tables in a fixed precedence order:
//!
//! identity → attribute → stat → combat (enemy catalogs only) →
//! type-property (type-group scope only) → trait (fallback).
//!
//! The fallback makes classification total: every field lands somewhere.
//! Precedence resolves names that could plausibly belong to more than one
//! table (`resistances` is stat-like but counts as combat for enemies).
//!
//! Each schema version gets its own immutable [`RuleSet`]; callers select
//! one at construction time and never mutate it. Supporting a new schema
//! version means adding a new rule-set value, not editing this one.

use serde::{Deserialize, Serialize};

// ============================================================================
// Types
// ============================================================================

/// The six ability scores, in canonical order.
pub const ATTRIBUTE_NAMES: &[&str] = &[
    "strength",
    "dexterity",
    "constitution",
    "intelligence",
    "wisdom",
    "charisma",
];

/// Target section for a classified field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    /// Immutable identifying fields, kept at the item root.
    Identity,
    /// One of the six ability scores.
    Attribute,
    /// Derived gameplay value (formula or structured range).
    Stat,
    /// Enemy-only ability and resistance lists.
    Combat,
    /// Type-level descriptive field, inherited by all items of a group.
    TypeProperty,
    /// Catch-all for flags, overrides, and special markers.
    Trait,
}

/// What a catalog document holds. Combat sections only exist for enemies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogKind {
    Enemy,
    Item,
}

impl CatalogKind {
    pub fn is_enemy(self) -> bool {
        matches!(self, CatalogKind::Enemy)
    }
}

/// Nesting level of the record being classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeLevel {
    Item,
    TypeGroup,
}

/// Enclosing scope for a classification lookup.
#[derive(Debug, Clone, Copy)]
pub struct FieldScope {
    pub kind: CatalogKind,
    pub level: ScopeLevel,
}

impl FieldScope {
    pub fn item(kind: CatalogKind) -> Self {
        Self {
            kind,
            level: ScopeLevel::Item,
        }
    }

    pub fn type_group(kind: CatalogKind) -> Self {
        Self {
            kind,
            level: ScopeLevel::TypeGroup,
        }
    }
}

// ============================================================================
// Rule Sets
// ============================================================================

/// Immutable classification tables for one schema-version pair.
#[derive(Debug)]
pub struct RuleSet {
    /// Version stamp this rule-set migrates documents to.
    pub target_version: &'static str,
    identity: &'static [&'static str],
    attributes: &'static [&'static str],
    stats: &'static [&'static str],
    combat: &'static [&'static str],
    type_properties: &'static [&'static str],
}

/// Rules for migrating legacy catalogs to the v5.1 schema.
static V5_RULES: RuleSet = RuleSet {
    target_version: "5.1",
    identity: &[
        "slug",
        "name",
        "rarity",
        "rarityWeight",
        // Legacy alias for rarityWeight; renamed by the item migrator.
        "selectionWeight",
        "level",
        "xp",
    ],
    attributes: ATTRIBUTE_NAMES,
    stats: &[
        "health",
        "mana",
        "stamina",
        "attack",
        "defense",
        "speed",
        "magicPower",
        "damage",
    ],
    combat: &[
        "abilities",
        "abilityUnlocks",
        "resistances",
        "vulnerabilities",
        "immunities",
    ],
    type_properties: &[
        "category",
        "size",
        "behavior",
        "damageType",
        "habitat",
        "description",
        "weaponType",
        "armorType",
        "consumableType",
    ],
};

impl RuleSet {
    /// The rule-set targeting schema version 5.1.
    pub fn v5() -> &'static RuleSet {
        &V5_RULES
    }

    /// Classify a field name within the given scope.
    ///
    /// Total: any name not claimed by an earlier table falls through to
    /// [`Section::Trait`].
    pub fn classify(&self, field: &str, scope: FieldScope) -> Section {
        if self.identity.contains(&field) {
            return Section::Identity;
        }
        if self.attributes.contains(&field) {
            return Section::Attribute;
        }
        if self.stats.contains(&field) {
            return Section::Stat;
        }
        if scope.kind.is_enemy() && self.combat.contains(&field) {
            return Section::Combat;
        }
        if scope.level == ScopeLevel::TypeGroup && self.type_properties.contains(&field) {
            return Section::TypeProperty;
        }
        Section::Trait
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn enemy_item() -> FieldScope {
        FieldScope::item(CatalogKind::Enemy)
    }

    fn plain_item() -> FieldScope {
        FieldScope::item(CatalogKind::Item)
    }

    #[test]
    fn test_identity_fields() {
        let rules = RuleSet::v5();
        for field in ["slug", "name", "rarity", "rarityWeight", "level", "xp"] {
            assert_eq!(rules.classify(field, enemy_item()), Section::Identity);
            assert_eq!(rules.classify(field, plain_item()), Section::Identity);
        }
    }

    #[test]
    fn test_attribute_fields() {
        let rules = RuleSet::v5();
        for field in ATTRIBUTE_NAMES {
            assert_eq!(rules.classify(field, enemy_item()), Section::Attribute);
        }
    }

    #[test]
    fn test_stat_fields() {
        let rules = RuleSet::v5();
        assert_eq!(rules.classify("health", enemy_item()), Section::Stat);
        assert_eq!(rules.classify("damage", plain_item()), Section::Stat);
        assert_eq!(rules.classify("magicPower", plain_item()), Section::Stat);
    }

    #[test]
    fn test_combat_only_for_enemies() {
        let rules = RuleSet::v5();
        assert_eq!(rules.classify("resistances", enemy_item()), Section::Combat);
        assert_eq!(rules.classify("abilities", enemy_item()), Section::Combat);
        // Same names fall through to traits for non-enemy catalogs.
        assert_eq!(rules.classify("resistances", plain_item()), Section::Trait);
        assert_eq!(rules.classify("abilities", plain_item()), Section::Trait);
    }

    #[test]
    fn test_type_properties_only_at_type_group_level() {
        let rules = RuleSet::v5();
        let group = FieldScope::type_group(CatalogKind::Enemy);
        assert_eq!(rules.classify("habitat", group), Section::TypeProperty);
        assert_eq!(rules.classify("description", group), Section::TypeProperty);
        // At item level the same names are traits.
        assert_eq!(rules.classify("habitat", enemy_item()), Section::Trait);
    }

    #[test]
    fn test_fallback_is_total() {
        let rules = RuleSet::v5();
        for field in ["packLeader", "legendary", "questBoss", "noSuchField", ""] {
            assert_eq!(rules.classify(field, enemy_item()), Section::Trait);
        }
    }

    #[test]
    fn test_target_version() {
        assert_eq!(RuleSet::v5().target_version, "5.1");
    }
}
