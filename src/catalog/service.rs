//! Catalog service client: per-variant attribute schemas.
//!
//! Schemas are memoized by identifier (last write wins, no invalidation) and
//! every failure degrades to an empty schema so a flaky catalog service never
//! kills a resolution session.

use std::collections::HashMap;
use std::sync::Mutex;

use serde::Deserialize;

use crate::catalog::{AttributeDirectory, AttributeMeta, ItemCatalog};
use crate::data::{ApiEnvelope, MarketClient};
use crate::domain::{AttributeRange, ItemVariant, Rarity};

const SECONDARY_MIN_PREFIX: &str = "secondary_min_";
const SECONDARY_MAX_PREFIX: &str = "secondary_max_";

/// Raw variant record as served by `/items/{id}?condense=true`.
///
/// Roll ranges arrive as dynamic `secondary_min_*`/`secondary_max_*` field
/// pairs; they are folded into tagged records exactly once, here.
#[derive(Debug, Deserialize)]
struct VariantRecord {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    rarity: Option<String>,
    #[serde(flatten)]
    extra: HashMap<String, serde_json::Value>,
}

pub struct CatalogService {
    client: MarketClient,
    attributes: AttributeDirectory,
    cache: Mutex<HashMap<String, ItemVariant>>,
}

impl CatalogService {
    /// Build the service, loading the attribute directory once. A failed
    /// directory fetch degrades to an empty directory rather than failing
    /// startup.
    pub async fn connect(client: MarketClient) -> Self {
        let attributes = match client
            .get_json::<ApiEnvelope<Vec<AttributeMeta>>>("/items/attributes", &[])
            .await
        {
            Ok(envelope) => {
                let metas = envelope.body.unwrap_or_default();
                log::info!("Loaded {} attribute directory entries", metas.len());
                AttributeDirectory::new(metas)
            }
            Err(e) => {
                log::warn!("Attribute directory unavailable ({e}), using fallback names");
                AttributeDirectory::empty()
            }
        };

        Self {
            client,
            attributes,
            cache: Mutex::new(HashMap::new()),
        }
    }

    #[cfg(test)]
    pub fn offline(client: MarketClient) -> Self {
        Self {
            client,
            attributes: AttributeDirectory::empty(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn attributes(&self) -> &AttributeDirectory {
        &self.attributes
    }

    /// Fetch the full schema for one variant, memoized by identifier.
    ///
    /// An unreachable service or malformed record degrades to an empty schema
    /// (no secondary attributes, rarity derived from the identifier suffix).
    pub async fn variant(&self, id: &str) -> ItemVariant {
        if let Ok(cache) = self.cache.lock()
            && let Some(cached) = cache.get(id)
        {
            return cached.clone();
        }

        let path = format!("/items/{id}");
        let params = [("condense".to_string(), "true".to_string())];
        let variant = match self
            .client
            .get_json::<ApiEnvelope<VariantRecord>>(&path, &params)
            .await
        {
            Ok(envelope) => match envelope.body {
                Some(record) => self.variant_from_record(id, record),
                None => empty_schema(id),
            },
            Err(e) => {
                log::warn!("Schema lookup failed for {id} ({e}), treating as attribute-free");
                empty_schema(id)
            }
        };

        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(id.to_string(), variant.clone());
        }
        variant
    }

    fn variant_from_record(&self, id: &str, record: VariantRecord) -> ItemVariant {
        let (base, suffix_rarity) = ItemCatalog::split_id(id);

        let rarity = record
            .rarity
            .as_deref()
            .and_then(|label| label.parse::<Rarity>().ok())
            .or(suffix_rarity)
            .unwrap_or(Rarity::Common);

        let mut attributes: Vec<AttributeRange> = record
            .extra
            .iter()
            .filter_map(|(field, value)| {
                let key = field.strip_prefix(SECONDARY_MIN_PREFIX)?;
                let min = value.as_f64()?;
                let max = record
                    .extra
                    .get(&format!("{SECONDARY_MAX_PREFIX}{key}"))?
                    .as_f64()?;
                Some(AttributeRange {
                    key: key.to_string(),
                    display: self.attributes.display_for(key),
                    min,
                    max,
                    is_percentage: self.attributes.is_percentage(key),
                })
            })
            .collect();
        attributes.sort_by(|a, b| a.key.cmp(&b.key));

        ItemVariant {
            id: id.to_string(),
            base: base.to_string(),
            name: record.name.unwrap_or_else(|| base.to_string()),
            rarity,
            attributes,
        }
    }
}

/// Fallback schema when the catalog service cannot be reached.
fn empty_schema(id: &str) -> ItemVariant {
    let (base, suffix_rarity) = ItemCatalog::split_id(id);
    ItemVariant {
        id: id.to_string(),
        base: base.to_string(),
        name: base.to_string(),
        rarity: suffix_rarity.unwrap_or(Rarity::Common),
        attributes: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> CatalogService {
        CatalogService::offline(MarketClient::new("http://localhost:9").unwrap())
    }

    fn record(json: &str) -> VariantRecord {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn roll_ranges_become_tagged_records() {
        let svc = service();
        let rec = record(
            r#"{
                "name": "Falchion",
                "rarity": "Rare",
                "secondary_min_strength": 1,
                "secondary_max_strength": 3,
                "secondary_min_agility": 1.0,
                "secondary_max_agility": 2.0
            }"#,
        );
        let variant = svc.variant_from_record("Falchion_4001", rec);

        assert_eq!(variant.rarity, Rarity::Rare);
        assert_eq!(variant.attributes.len(), 2);
        // Sorted by key
        assert_eq!(variant.attributes[0].key, "agility");
        assert_eq!(variant.attributes[1].key, "strength");
        assert_eq!(variant.attributes[1].min, 1.0);
        assert_eq!(variant.attributes[1].max, 3.0);
        assert_eq!(variant.attributes[1].display, "Strength");
    }

    #[test]
    fn orphan_min_field_is_skipped() {
        let svc = service();
        let rec = record(r#"{"name":"Kris","secondary_min_will":2}"#);
        let variant = svc.variant_from_record("Kris_4001", rec);
        assert!(variant.attributes.is_empty());
    }

    #[test]
    fn rarity_falls_back_to_identifier_suffix() {
        let svc = service();
        let rec = record(r#"{"name":"Falchion"}"#);
        let variant = svc.variant_from_record("Falchion_6001", rec);
        assert_eq!(variant.rarity, Rarity::Legendary);
    }

    #[test]
    fn empty_schema_derives_identity_from_id() {
        let variant = empty_schema("Lantern_2001");
        assert_eq!(variant.base, "Lantern");
        assert_eq!(variant.name, "Lantern");
        assert_eq!(variant.rarity, Rarity::Common);
        assert!(variant.attributes.is_empty());
    }
}
