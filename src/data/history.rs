//! Paginated retrieval of a variant's trailing price history.
//!
//! The upstream limits result size per request, so the trailing window is
//! split into four fixed 4-day sub-windows fetched independently and merged
//! into one chronologically sorted sequence. The split is a transport detail,
//! not a semantic boundary.

use chrono::{DateTime, Duration, Utc};
use futures::future::join_all;

use crate::config::MARKET;
use crate::data::{ApiEnvelope, MarketClient};
use crate::domain::{ModifierFilter, PriceSample};
use crate::error::Result;
use crate::utils::time_utils;

/// One contiguous slice of the trailing window. The newest sub-window leaves
/// `to` open so the query runs right up to the present bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct SubWindow {
    pub from: DateTime<Utc>,
    pub to: Option<DateTime<Utc>>,
}

/// Split `[now - total, now)` into contiguous sub-windows, oldest first.
pub fn sub_windows(now: DateTime<Utc>) -> Vec<SubWindow> {
    let count = MARKET.history.sub_windows;
    let width = Duration::days(MARKET.history.days_per_window);

    (0..count)
        .map(|k| {
            let back = (count - k) as i32;
            let from = now - width * back;
            let to = if k == count - 1 {
                None
            } else {
                Some(now - width * (back - 1))
            };
            SubWindow { from, to }
        })
        .collect()
}

/// Concatenate per-window results oldest-first, then re-sort globally.
///
/// Windows are already internally ordered, but the global sort guards the
/// aggregator against any cross-window interleaving.
pub fn merge_windows(windows: Vec<Vec<PriceSample>>) -> Vec<PriceSample> {
    let mut merged: Vec<PriceSample> = windows.into_iter().flatten().collect();
    merged.sort_by_key(|s| s.timestamp);
    merged
}

pub struct HistoryFetcher {
    client: MarketClient,
}

impl HistoryFetcher {
    pub fn new(client: MarketClient) -> Self {
        Self { client }
    }

    /// Fetch the full trailing history for one variant.
    ///
    /// All sub-windows must succeed; a single failure aborts the whole fetch
    /// and no partial sequence is ever returned. An empty merged sequence is
    /// `Ok`: emptiness is the caller's no-data signal, not a fetch failure.
    pub async fn fetch(
        &self,
        variant_id: &str,
        modifier: Option<&ModifierFilter>,
        now: DateTime<Utc>,
    ) -> Result<Vec<PriceSample>> {
        let windows = sub_windows(now);
        log::info!(
            "Fetching {} sub-windows of history for {variant_id}",
            windows.len()
        );

        let requests = windows
            .iter()
            .map(|window| self.fetch_window(variant_id, modifier, window));
        let results = join_all(requests).await;

        let mut per_window = Vec::with_capacity(results.len());
        for result in results {
            per_window.push(result?);
        }

        let merged = merge_windows(per_window);
        log::info!("Merged {} price buckets for {variant_id}", merged.len());
        Ok(merged)
    }

    async fn fetch_window(
        &self,
        variant_id: &str,
        modifier: Option<&ModifierFilter>,
        window: &SubWindow,
    ) -> Result<Vec<PriceSample>> {
        let path = format!("/market/analytics/{variant_id}/prices/history");

        let mut params = vec![
            (
                "interval".to_string(),
                MARKET.history.bucket_interval.to_string(),
            ),
            ("from".to_string(), time_utils::iso_utc(window.from)),
        ];
        if let Some(to) = window.to {
            params.push(("to".to_string(), time_utils::iso_utc(to)));
        }
        if let Some(filter) = modifier {
            params.push((filter.query_key(), filter.value.to_string()));
        }

        let envelope: ApiEnvelope<Vec<PriceSample>> =
            self.client.get_json(&path, &params).await?;
        Ok(envelope.body.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::price_sample::test_support::sample;
    use chrono::TimeZone;

    fn reference_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 17, 12, 0, 0).unwrap()
    }

    #[test]
    fn four_contiguous_windows_cover_sixteen_days() {
        let now = reference_now();
        let windows = sub_windows(now);

        assert_eq!(windows.len(), 4);
        assert_eq!(windows[0].from, now - Duration::days(16));
        for pair in windows.windows(2) {
            assert_eq!(
                pair[0].to,
                Some(pair[1].from),
                "sub-windows must be contiguous"
            );
        }
    }

    #[test]
    fn newest_window_is_open_ended() {
        let windows = sub_windows(reference_now());
        assert!(windows.last().unwrap().to.is_none());
        assert!(windows[..3].iter().all(|w| w.to.is_some()));
    }

    #[test]
    fn merge_sorts_across_windows() {
        // Simulate a cross-window interleave: the "older" window carries one
        // bucket that postdates the newer window's first bucket.
        let older = vec![sample(0, 10.0, 20.0, 15.0, 1.0), sample(5, 10.0, 20.0, 15.0, 1.0)];
        let newer = vec![sample(3, 10.0, 20.0, 15.0, 1.0), sample(7, 10.0, 20.0, 15.0, 1.0)];

        let merged = merge_windows(vec![older, newer]);

        let timestamps: Vec<_> = merged.iter().map(|s| s.timestamp).collect();
        let mut sorted = timestamps.clone();
        sorted.sort();
        assert_eq!(timestamps, sorted);
        assert_eq!(merged.len(), 4);
    }

    #[test]
    fn merge_of_empty_windows_is_empty() {
        assert!(merge_windows(vec![Vec::new(), Vec::new()]).is_empty());
    }
}
