//! Error types shared across the resolution and analytics pipeline.

use std::fmt;

/// Result type alias for market operations.
pub type Result<T> = std::result::Result<T, MarketError>;

/// Main error type for the crate.
///
/// `Validation` is the only recoverable kind: the session stays on its current
/// step and re-prompts. Everything else is terminal for the session and never
/// retried.
#[derive(Debug)]
pub enum MarketError {
    /// Malformed or out-of-range user input (recoverable, re-prompt)
    Validation(String),
    /// Upstream history or catalog request failure (aborts the session)
    Fetch(String),
    /// Empty result after fetch or after filtering (not a crash)
    NoData,
    /// Chart rendering failure
    Render(String),
    /// HTTP transport error
    Http(reqwest::Error),
    /// JSON serialization/deserialization error
    Json(serde_json::Error),
}

impl std::error::Error for MarketError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MarketError::Http(e) => Some(e),
            MarketError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for MarketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketError::Validation(msg) => write!(f, "Invalid input: {msg}"),
            MarketError::Fetch(msg) => write!(f, "Fetch error: {msg}"),
            MarketError::NoData => write!(f, "No market history data available"),
            MarketError::Render(msg) => write!(f, "Chart rendering error: {msg}"),
            MarketError::Http(e) => write!(f, "HTTP error: {e}"),
            MarketError::Json(e) => write!(f, "JSON error: {e}"),
        }
    }
}

impl From<reqwest::Error> for MarketError {
    fn from(err: reqwest::Error) -> Self {
        MarketError::Http(err)
    }
}

impl From<serde_json::Error> for MarketError {
    fn from(err: serde_json::Error) -> Self {
        MarketError::Json(err)
    }
}

impl MarketError {
    /// Recoverable errors keep the session alive on the same step.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, MarketError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_validation_is_recoverable() {
        assert!(MarketError::Validation("x".into()).is_recoverable());
        assert!(!MarketError::Fetch("x".into()).is_recoverable());
        assert!(!MarketError::NoData.is_recoverable());
        assert!(!MarketError::Render("x".into()).is_recoverable());
    }
}
