use std::sync::Arc;

use crate::board::Board;
use crate::upstream::UpstreamClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Used directly by the `/api/jobs` proxy.
    pub upstream: UpstreamClient,
    /// The single board session. Its store is the only mutable shared state.
    pub board: Arc<Board>,
}
