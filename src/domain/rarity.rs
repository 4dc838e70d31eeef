//! Rarity tiers and their identifier suffix codes.
//!
//! Full item identifiers carry a four-digit rarity code as their last
//! underscore-separated segment (e.g. `Falchion_4001` is a Rare Falchion).
//! Identifiers without a known code (e.g. `GoldenKey`) have no tiered
//! variants.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// The seven tiers, ordered lowest to highest.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
    Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Rarity {
    Poor,
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
    Unique,
}

impl Rarity {
    /// Identifier suffix code for this tier.
    pub fn code(&self) -> &'static str {
        match self {
            Rarity::Poor => "1001",
            Rarity::Common => "2001",
            Rarity::Uncommon => "3001",
            Rarity::Rare => "4001",
            Rarity::Epic => "5001",
            Rarity::Legendary => "6001",
            Rarity::Unique => "7001",
        }
    }

    /// Reverse lookup from an identifier suffix code.
    pub fn from_code(code: &str) -> Option<Rarity> {
        match code {
            "1001" => Some(Rarity::Poor),
            "2001" => Some(Rarity::Common),
            "3001" => Some(Rarity::Uncommon),
            "4001" => Some(Rarity::Rare),
            "5001" => Some(Rarity::Epic),
            "6001" => Some(Rarity::Legendary),
            "7001" => Some(Rarity::Unique),
            _ => None,
        }
    }

    /// Poor and Common items never roll secondary attributes, so they are
    /// never offered a modifier-filter step.
    pub fn supports_modifiers(&self) -> bool {
        !matches!(self, Rarity::Poor | Rarity::Common)
    }
}
