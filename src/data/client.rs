//! HTTP client for the marketplace REST API.

use std::time::Duration;

use serde::Deserialize;

use crate::config::MARKET;
use crate::error::{MarketError, Result};

/// Standard response envelope used by every marketplace endpoint.
///
/// `body` is null when a query legitimately matches nothing, which is not a
/// fetch failure.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: serde::Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub body: Option<T>,
}

/// Thin wrapper around one shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct MarketClient {
    http: reqwest::Client,
    base_url: String,
}

impl MarketClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(MARKET.client.timeout_ms))
            .user_agent(MARKET.client.user_agent)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET a JSON payload. Non-success statuses and malformed bodies both
    /// surface as `Fetch`; callers never see partial responses.
    pub async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.http.get(&url).query(params).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MarketError::Fetch(format!("{path} returned HTTP {status}")));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| MarketError::Fetch(format!("{path} returned a malformed body: {e}")))
    }
}
