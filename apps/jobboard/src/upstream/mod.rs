//! Upstream client: the single point of entry for calls to the remote jobs API.
//!
//! Both the `/api/jobs` proxy and the board's listing source go through this
//! module. No timeout is configured; a hung upstream keeps the caller waiting.

use bytes::Bytes;
use reqwest::Client;
use serde::de::IgnoredAny;
use thiserror::Error;
use tracing::debug;

use crate::models::listing::{Listing, ListingPayload};

/// Public Remotive endpoint used when `UPSTREAM_URL` is not set.
pub const DEFAULT_UPSTREAM_URL: &str = "https://remotive.com/api/remote-jobs";

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("HTTP error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Upstream returned status {status}")]
    Status { status: u16 },

    #[error("JSON decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Filters forwarded to the upstream API. `None` means "not sent".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpstreamQuery<'a> {
    pub search: Option<&'a str>,
    pub category: Option<&'a str>,
}

impl<'a> UpstreamQuery<'a> {
    /// Query parameters in the order the upstream expects them.
    pub fn params(&self) -> Vec<(&'static str, &'a str)> {
        let mut params = Vec::new();
        if let Some(search) = self.search {
            params.push(("search", search));
        }
        if let Some(category) = self.category {
            params.push(("category", category));
        }
        params
    }
}

#[derive(Clone)]
pub struct UpstreamClient {
    client: Client,
    base_url: String,
}

impl UpstreamClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches the response body for the given filters, untouched.
    ///
    /// Non-2xx responses are errors. The body is checked to be JSON but not
    /// re-encoded, so the proxy can forward it byte for byte.
    pub async fn fetch_bytes(&self, query: &UpstreamQuery<'_>) -> Result<Bytes, UpstreamError> {
        let params = query.params();
        debug!("GET {} params={:?}", self.base_url, params);

        let response = self
            .client
            .get(&self.base_url)
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice::<IgnoredAny>(&body)?;
        Ok(body)
    }

    /// Fetches and decodes the `jobs` array.
    pub async fn fetch_listings(
        &self,
        query: &UpstreamQuery<'_>,
    ) -> Result<Vec<Listing>, UpstreamError> {
        let body = self.fetch_bytes(query).await?;
        let payload: ListingPayload = serde_json::from_slice(&body)?;
        debug!("Upstream returned {} listings", payload.jobs.len());
        Ok(payload.jobs)
    }
}
