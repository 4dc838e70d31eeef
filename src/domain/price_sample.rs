//! Wire model for one historical price bucket.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One fixed-width time bucket of aggregated trade prices.
///
/// Buckets arrive ordered by timestamp ascending within a window and are
/// assumed bucket-unique upstream, so duplicates are never deduplicated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSample {
    pub timestamp: DateTime<Utc>,
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub volume: f64,
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use chrono::TimeZone;

    /// Bucket at `hours` past a fixed epoch, for fixtures.
    pub fn sample(hours: i64, min: f64, max: f64, avg: f64, volume: f64) -> PriceSample {
        let base = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        PriceSample {
            timestamp: base + chrono::Duration::hours(hours),
            min,
            max,
            avg,
            volume,
        }
    }
}
