//! The item catalog: an immutable table of full item identifiers.
//!
//! Constructed once before any session starts and never mutated afterwards,
//! so lookups are safe for unrestricted concurrent reads.

pub mod attributes;
pub mod service;

use std::path::Path;

use anyhow::{Context, Result};
use itertools::Itertools;

use crate::domain::Rarity;

pub use attributes::{AttributeDirectory, AttributeMeta};
pub use service::CatalogService;

/// Read-only list of every known full item identifier.
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    ids: Vec<String>,
}

impl ItemCatalog {
    pub fn from_ids(ids: Vec<String>) -> Self {
        Self { ids }
    }

    /// Load the identifier list from a JSON array file (the artifact of the
    /// catalog download tooling).
    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading catalog file {}", path.display()))?;
        let ids: Vec<String> = serde_json::from_str(&content)
            .with_context(|| format!("parsing catalog file {}", path.display()))?;
        Ok(Self::from_ids(ids))
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Split a full identifier into its base type and rarity, if the last
    /// underscore-separated segment is a known rarity code.
    pub fn split_id(id: &str) -> (&str, Option<Rarity>) {
        match id.split_once('_') {
            Some((base, _)) => {
                let suffix = id.rsplit('_').next().unwrap_or_default();
                (base, Rarity::from_code(suffix))
            }
            None => (id, None),
        }
    }

    /// Distinct base names whose prefix matches `term`, case-insensitively.
    pub fn search_bases(&self, term: &str) -> Vec<String> {
        let needle = term.to_lowercase();
        self.ids
            .iter()
            .map(|id| Self::split_id(id).0)
            .filter(|base| base.to_lowercase().starts_with(&needle))
            .unique_by(|base| base.to_lowercase())
            .map(str::to_string)
            .collect()
    }

    /// All full identifiers that are tiered variants of `base`.
    ///
    /// Returns the identifiers in catalog order; empty when the base itself
    /// is the identifier (untiered items carry no rarity suffix).
    pub fn variants_of(&self, base: &str) -> Vec<String> {
        let prefix = format!("{base}_");
        self.ids
            .iter()
            .filter(|id| id.starts_with(&prefix))
            .cloned()
            .collect()
    }

    /// Distinct rarities present among candidate identifiers, in tier order.
    pub fn rarities_of(candidates: &[String]) -> Vec<Rarity> {
        candidates
            .iter()
            .filter_map(|id| Self::split_id(id).1)
            .unique()
            .sorted()
            .collect()
    }
}
