//! Marketplace API configuration constants and types.

/// Geometry of the trailing history window.
///
/// The upstream caps result size per request, so the window is split into
/// fixed sub-windows fetched independently and merged afterwards.
pub struct HistoryWindow {
    /// Number of sub-window requests per fetch
    pub sub_windows: usize,
    /// Width of one sub-window in days
    pub days_per_window: i64,
    /// Bucket granularity passed as the `interval` query parameter
    pub bucket_interval: &'static str,
}

impl HistoryWindow {
    /// Total trailing window covered by one fetch, in days.
    pub fn total_days(&self) -> i64 {
        self.sub_windows as i64 * self.days_per_window
    }
}

/// Default values for the Rest Client
pub struct ClientDefaults {
    pub timeout_ms: u64,
    pub user_agent: &'static str,
}

/// The Master Configuration Struct
pub struct MarketConfig {
    /// REST base URL of the marketplace API
    pub base_url: &'static str,
    pub history: HistoryWindow,
    pub client: ClientDefaults,
}

pub const MARKET: MarketConfig = MarketConfig {
    base_url: "https://api.darkerdb.com/v1",
    history: HistoryWindow {
        sub_windows: 4,
        days_per_window: 4,
        bucket_interval: "30m",
    },
    client: ClientDefaults {
        timeout_ms: 10_000,
        user_agent: "price-scout/0.1",
    },
};
