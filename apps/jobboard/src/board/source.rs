//! Listing source: the seam between the board and wherever listings come from.
//!
//! `Board` holds an `Arc<dyn ListingSource>`; production wires in
//! `HttpListingSource`, tests wire in scripted sources.

use async_trait::async_trait;
use tracing::warn;

use crate::board::store::ALL_CATEGORIES;
use crate::models::Listing;
use crate::upstream::{UpstreamClient, UpstreamError, UpstreamQuery};

#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetches listings for the raw filter inputs. Implementations decide which
    /// filters are forwarded; see `upstream_query`.
    async fn try_fetch(&self, query: &str, category: &str) -> Result<Vec<Listing>, UpstreamError>;
}

/// Fetches listings, collapsing any failure into an empty set.
///
/// The error is logged and dropped, so callers cannot tell "no matches" from
/// "fetch failed".
// TODO: return the `UpstreamError` alongside the empty set so the board page can
// render a fetch-failed banner instead of "No Jobs Found".
pub async fn fetch_listings(source: &dyn ListingSource, query: &str, category: &str) -> Vec<Listing> {
    match source.try_fetch(query, category).await {
        Ok(listings) => listings,
        Err(e) => {
            warn!("Listing fetch failed (query={query:?}, category={category:?}): {e}");
            Vec::new()
        }
    }
}

/// Maps board filter inputs to upstream parameters: `search` only when the
/// query is non-empty, `category` only when set and not the "all" sentinel.
pub fn upstream_query<'a>(query: &'a str, category: &'a str) -> UpstreamQuery<'a> {
    UpstreamQuery {
        search: (!query.is_empty()).then_some(query),
        category: (!category.is_empty() && category != ALL_CATEGORIES).then_some(category),
    }
}

/// Listing source backed by the remote jobs API.
pub struct HttpListingSource(pub UpstreamClient);

#[async_trait]
impl ListingSource for HttpListingSource {
    async fn try_fetch(&self, query: &str, category: &str) -> Result<Vec<Listing>, UpstreamError> {
        self.0.fetch_listings(&upstream_query(query, category)).await
    }
}


#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use super::*;
    use crate::upstream::testing::{spawn, unreachable_url, Reply};

    #[test]
    fn test_upstream_query_drops_empty_and_all() {
        assert_eq!(upstream_query("", ""), UpstreamQuery::default());
        assert_eq!(upstream_query("", "all"), UpstreamQuery::default());
        assert_eq!(
            upstream_query("rust", "all"),
            UpstreamQuery {
                search: Some("rust"),
                category: None
            }
        );
        assert_eq!(
            upstream_query("", "design"),
            UpstreamQuery {
                search: None,
                category: Some("design")
            }
        );
    }

    #[tokio::test]
    async fn test_http_source_sends_only_active_filters() {
        let upstream = spawn(Reply::Json(json!({ "jobs": [] }))).await;
        let source = HttpListingSource(UpstreamClient::new(upstream.url.clone()));

        let listings = fetch_listings(&source, "writer", "all").await;

        assert!(listings.is_empty());
        let seen = upstream.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].get("search").map(String::as_str), Some("writer"));
        assert!(!seen[0].contains_key("category"));
    }

    // Failures and genuine zero-match results are indistinguishable to callers.
    #[tokio::test]
    async fn test_network_failure_collapses_to_empty() {
        let source = HttpListingSource(UpstreamClient::new(unreachable_url().await));
        assert!(fetch_listings(&source, "rust", "").await.is_empty());
    }

    #[tokio::test]
    async fn test_decode_failure_collapses_to_empty() {
        let upstream = spawn(Reply::Raw(StatusCode::OK, "not json")).await;
        let source = HttpListingSource(UpstreamClient::new(upstream.url));
        assert!(fetch_listings(&source, "rust", "").await.is_empty());
    }

    #[tokio::test]
    async fn test_error_status_collapses_to_empty() {
        let upstream = spawn(Reply::Raw(StatusCode::SERVICE_UNAVAILABLE, "")).await;
        let source = HttpListingSource(UpstreamClient::new(upstream.url));
        assert!(fetch_listings(&source, "", "qa").await.is_empty());
    }
}
