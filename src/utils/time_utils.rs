use chrono::{DateTime, Utc};

/// Timestamp format used by the marketplace API in query parameters and
/// bucket payloads.
pub const API_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Format a UTC timestamp the way the history endpoint expects its
/// `from`/`to` query parameters.
pub fn iso_utc(dt: DateTime<Utc>) -> String {
    dt.format(API_TIME_FORMAT).to_string()
}

/// Format a timestamp for a day-boundary axis label.
pub fn day_label(dt: DateTime<Utc>, format: &str) -> String {
    dt.format(format).to_string()
}

pub fn utc_now() -> DateTime<Utc> {
    Utc::now()
}
