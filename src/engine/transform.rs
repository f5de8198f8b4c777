//! Value Transformers
//!
//! Pure conversions from a field's legacy encoding to its target encoding:
//! enum words to numbers, dice notation to structured ranges, numeric stat
//! constants to formula expressions, and collection shape normalization.
//!
//! Every transformer is total. Values it cannot interpret pass through
//! unchanged with a warning on the report; nothing here aborts a migration.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};

use super::report::MigrationReport;

// ============================================================================
// Fixed Tables
// ============================================================================

/// Descriptive attribute words and their numeric scores.
pub const ATTRIBUTE_WORDS: &[(&str, i64)] = &[
    ("very low", 6),
    ("low", 8),
    ("moderate", 10),
    ("normal", 10),
    ("average", 10),
    ("high", 14),
    ("very high", 16),
    ("exceptional", 18),
    ("legendary", 20),
];

/// Rarity words and their numeric values.
pub const RARITY_WORDS: &[(&str, i64)] = &[
    ("common", 75),
    ("uncommon", 50),
    ("rare", 25),
    ("epic", 10),
    ("legendary", 3),
    ("mythic", 1),
];

/// Rarity tier breakpoints: the first entry whose weight bound holds wins.
/// Ordered and monotone, so derived rarity never decreases with weight.
pub const RARITY_TIERS: &[(i64, i64)] = &[(10, 15), (30, 30), (60, 50), (85, 70)];

/// Tier for weights above the last breakpoint.
pub const RARITY_TIER_CEILING: i64 = 95;

/// Substituted when a value expected to be dice notation is unparseable.
pub const DEFAULT_RANGE: (i64, i64) = (1, 4);

/// Per-stat formula templates: (stat, modifier reference, modifier scale,
/// level scale). The rendered formula is
/// `<mod-ref> * <mod-scale> + level * <level-scale> + <original value>`.
pub const STAT_FORMULAS: &[(&str, &str, i64, i64)] = &[
    ("health", "constitution_mod", 2, 5),
    ("mana", "intelligence_mod", 2, 4),
    ("stamina", "constitution_mod", 2, 3),
    ("attack", "strength_mod", 2, 2),
    ("defense", "dexterity_mod", 2, 2),
    ("speed", "dexterity_mod", 1, 1),
    ("magicPower", "intelligence_mod", 2, 3),
];

/// Modifier reference attached to structured damage ranges.
pub const DAMAGE_MODIFIER: &str = "strength_mod";

// ============================================================================
// Regex Patterns
// ============================================================================

/// Dice notation: "2d6", "1d8".
static DICE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?P<count>\d+)d(?P<sides>\d+)\s*$")
        .expect("Failed to compile dice notation regex")
});

/// Flat range notation: "3-9".
static RANGE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?P<low>\d+)\s*-\s*(?P<high>\d+)\s*$")
        .expect("Failed to compile range notation regex")
});

// ============================================================================
// Enum Words
// ============================================================================

fn lookup_word(table: &[(&str, i64)], word: &str) -> Option<i64> {
    let word = word.trim().to_lowercase();
    table
        .iter()
        .find(|(name, _)| *name == word)
        .map(|(_, value)| *value)
}

/// Convert a descriptive attribute word ("high") to its numeric score.
/// Unknown words pass through unchanged with a warning.
pub fn attribute_value(field: &str, value: &Value, report: &mut MigrationReport) -> Value {
    match value {
        Value::String(word) => match lookup_word(ATTRIBUTE_WORDS, word) {
            Some(score) => json!(score),
            None => {
                report.add_warning(format!("unknown attribute word '{word}' for {field}"));
                value.clone()
            }
        },
        _ => value.clone(),
    }
}

/// Convert a rarity word ("rare") to its numeric value.
/// Unknown words pass through unchanged with a warning.
pub fn rarity_value(value: &Value, report: &mut MigrationReport) -> Value {
    match value {
        Value::String(word) => match lookup_word(RARITY_WORDS, word) {
            Some(rarity) => json!(rarity),
            None => {
                report.add_warning(format!("unknown rarity word '{word}'"));
                value.clone()
            }
        },
        _ => value.clone(),
    }
}

/// Derive the numeric rarity tier from a rarity weight.
pub fn rarity_tier_for_weight(weight: i64) -> i64 {
    for (bound, tier) in RARITY_TIERS {
        if weight <= *bound {
            return *tier;
        }
    }
    RARITY_TIER_CEILING
}

// ============================================================================
// Dice Notation
// ============================================================================

/// Convert dice ("2d6") or flat range ("3-9") notation to a structured
/// range object `{min, max, modifier}`.
///
/// Values that are already numeric or structured pass through. A string
/// matching neither grammar is replaced by the fixed default range, with
/// a warning.
pub fn dice_to_range(field: &str, value: &Value, modifier: &str, report: &mut MigrationReport) -> Value {
    match value {
        Value::String(text) => {
            if let Some(caps) = DICE_PATTERN.captures(text) {
                let count: i64 = caps["count"].parse().unwrap_or(1);
                let sides: i64 = caps["sides"].parse().unwrap_or(1);
                return json!({
                    "min": count,
                    "max": count.saturating_mul(sides),
                    "modifier": modifier,
                });
            }
            if let Some(caps) = RANGE_PATTERN.captures(text) {
                let low: i64 = caps["low"].parse().unwrap_or(0);
                let high: i64 = caps["high"].parse().unwrap_or(0);
                return json!({
                    "min": low,
                    "max": high,
                    "modifier": modifier,
                });
            }
            report.add_warning(format!(
                "unparseable dice notation '{text}' for {field}, substituting {}-{}",
                DEFAULT_RANGE.0, DEFAULT_RANGE.1
            ));
            json!({
                "min": DEFAULT_RANGE.0,
                "max": DEFAULT_RANGE.1,
                "modifier": modifier,
            })
        }
        Value::Number(_) | Value::Object(_) => value.clone(),
        _ => {
            report.add_warning(format!(
                "expected dice notation or range object for {field}, found {value}"
            ));
            value.clone()
        }
    }
}

// ============================================================================
// Stat Formulas
// ============================================================================

fn formula_template(stat: &str) -> Option<(&'static str, i64, i64)> {
    STAT_FORMULAS
        .iter()
        .find(|(name, _, _, _)| *name == stat)
        .map(|(_, mod_ref, mod_scale, level_scale)| (*mod_ref, *mod_scale, *level_scale))
}

/// Convert a numeric stat constant to its formula expression.
///
/// Deterministic: the same (stat, value) pair always renders identical
/// text. Values that are already strings are taken to be formulas and
/// pass through unchanged, so repeated migration is stable. Stats with no
/// template keep their literal value.
pub fn stat_to_formula(stat: &str, value: &Value) -> Value {
    match value {
        Value::String(_) => value.clone(),
        Value::Number(number) => match formula_template(stat) {
            Some((mod_ref, mod_scale, level_scale)) => Value::String(format!(
                "{mod_ref} * {mod_scale} + level * {level_scale} + {number}"
            )),
            None => value.clone(),
        },
        _ => value.clone(),
    }
}

/// Attribute modifier as used inside formula expressions. Documents the
/// intended semantics of `*_mod` references; the engine never evaluates
/// formulas itself.
pub fn attribute_modifier(score: i64) -> i64 {
    (score - 10).div_euclid(2)
}

// ============================================================================
// Collection Shapes
// ============================================================================

/// Normalize a trait or combat collection to the canonical sequence shape.
///
/// Mappings become the ordered sequence of their values; sequences pass
/// through unchanged. Any other shape is a structural anomaly: passed
/// through unmodified with a warning.
pub fn normalize_collection(field: &str, value: &Value, report: &mut MigrationReport) -> Value {
    match value {
        Value::Object(map) => Value::Array(map.values().cloned().collect()),
        Value::Array(_) => value.clone(),
        _ => {
            report.add_warning(format!(
                "expected {field} to be a mapping or sequence, found {value}"
            ));
            value.clone()
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
