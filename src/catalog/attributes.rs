//! Directory of secondary-attribute metadata (display names, value kinds).
//!
//! Fetched once at startup from the catalog service. When the service is
//! unreachable the directory degrades to empty and every display name falls
//! back to a title-cased key.

use std::collections::HashMap;

use serde::Deserialize;

/// One attribute entry as served by `/items/attributes`.
#[derive(Debug, Clone, Deserialize)]
pub struct AttributeMeta {
    pub id: String,
    #[serde(default)]
    pub display: Option<String>,
    #[serde(default)]
    pub is_percentage: bool,
}

#[derive(Debug, Clone, Default)]
pub struct AttributeDirectory {
    entries: HashMap<String, AttributeMeta>,
}

impl AttributeDirectory {
    pub fn new(metas: Vec<AttributeMeta>) -> Self {
        let entries = metas.into_iter().map(|m| (m.id.clone(), m)).collect();
        Self { entries }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Directory entries are keyed with a leading capital while roll keys on
    /// item records are lowercase, so lookups try both spellings.
    fn lookup(&self, key: &str) -> Option<&AttributeMeta> {
        self.entries
            .get(key)
            .or_else(|| self.entries.get(&capitalize(key)))
    }

    /// Human-readable name for an attribute key, falling back to a
    /// title-cased derivation when the directory has no entry.
    pub fn display_for(&self, key: &str) -> String {
        self.lookup(key)
            .and_then(|m| m.display.clone())
            .unwrap_or_else(|| title_case(key))
    }

    pub fn is_percentage(&self, key: &str) -> bool {
        self.lookup(key).map(|m| m.is_percentage).unwrap_or(false)
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// `strike_chance` → `Strike Chance`
pub fn title_case(key: &str) -> String {
    key.split('_')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_case_fallback() {
        assert_eq!(title_case("strike_chance"), "Strike Chance");
        assert_eq!(title_case("agility"), "Agility");
    }

    #[test]
    fn display_prefers_directory_entry() {
        let dir = AttributeDirectory::new(vec![AttributeMeta {
            id: "Strike_chance".into(),
            display: Some("Chance to Strike".into()),
            is_percentage: true,
        }]);
        assert_eq!(dir.display_for("strike_chance"), "Chance to Strike");
        assert!(dir.is_percentage("strike_chance"));
    }

    #[test]
    fn empty_directory_degrades_to_title_case() {
        let dir = AttributeDirectory::empty();
        assert_eq!(dir.display_for("magic_damage_bonus"), "Magic Damage Bonus");
        assert!(!dir.is_percentage("magic_damage_bonus"));
    }
}
