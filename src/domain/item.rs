//! Item variants and their secondary-attribute roll ranges.

use serde::{Deserialize, Serialize};

use crate::domain::Rarity;

/// One declared secondary-attribute roll range on a variant.
///
/// Built once per variant from the catalog record; the interactive flow only
/// ever reads these tagged records, never the raw catalog fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeRange {
    /// Canonical attribute key as used by the market API (e.g. `strike_chance`)
    pub key: String,
    /// Human-readable name shown to the user
    pub display: String,
    pub min: f64,
    pub max: f64,
    /// Percentage-valued attributes get a finer suggested input step
    pub is_percentage: bool,
}

impl AttributeRange {
    /// Advisory input granularity, not enforced upstream.
    pub fn suggested_step(&self) -> f64 {
        if self.is_percentage { 0.1 } else { 1.0 }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// One concrete tradable item identity.
///
/// Constructed on demand from catalog lookups, immutable afterwards, and
/// discarded at the end of one resolution session.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemVariant {
    /// Full identifier, e.g. `Falchion_4001`
    pub id: String,
    /// Base type shared across rarity tiers, e.g. `Falchion`
    pub base: String,
    /// Display name from the catalog, falling back to the base type
    pub name: String,
    pub rarity: Rarity,
    /// Declared secondary-attribute roll ranges, sorted by key
    pub attributes: Vec<AttributeRange>,
}

impl ItemVariant {
    /// Whether the resolution flow should offer a stat-filter step at all.
    pub fn offers_modifier_step(&self) -> bool {
        !self.attributes.is_empty() && self.rarity.supports_modifiers()
    }

    pub fn attribute(&self, key: &str) -> Option<&AttributeRange> {
        self.attributes.iter().find(|a| a.key == key)
    }
}

/// A resolved (attribute, value) constraint applied to every history request.
#[derive(Debug, Clone, PartialEq)]
pub struct ModifierFilter {
    pub attribute: AttributeRange,
    pub value: f64,
}

impl ModifierFilter {
    /// Query-parameter key understood by the history endpoint.
    pub fn query_key(&self) -> String {
        format!("secondary[{}]", self.attribute.key)
    }

    /// Summary fragment for the notification text.
    pub fn describe(&self) -> String {
        format!("{} = {}", self.attribute.display, self.value)
    }
}
