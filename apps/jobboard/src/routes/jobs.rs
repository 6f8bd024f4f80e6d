use axum::{
    extract::{Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::state::AppState;
use crate::upstream::UpstreamQuery;

#[derive(Debug, Default, Deserialize)]
pub struct ProxyParams {
    pub search: Option<String>,
    pub category: Option<String>,
}

impl ProxyParams {
    /// Empty values are dropped rather than forwarded as `search=`.
    fn upstream_query(&self) -> UpstreamQuery<'_> {
        UpstreamQuery {
            search: self.search.as_deref().filter(|s| !s.is_empty()),
            category: self.category.as_deref().filter(|c| !c.is_empty()),
        }
    }
}

/// GET /api/jobs
///
/// Forwards the upstream body byte for byte. Keeps the flat
/// `{"error": "..."}` body callers of the proxy already expect.
pub async fn handle_proxy_jobs(
    State(state): State<AppState>,
    Query(params): Query<ProxyParams>,
) -> Response {
    match state.upstream.fetch_bytes(&params.upstream_query()).await {
        Ok(body) => (
            [
                (
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("application/json"),
                ),
                (
                    header::ACCESS_CONTROL_ALLOW_ORIGIN,
                    HeaderValue::from_static("*"),
                ),
            ],
            body,
        )
            .into_response(),
        Err(e) => {
            warn!("Job proxy request failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to fetch jobs" })),
            )
                .into_response()
        }
    }
}
