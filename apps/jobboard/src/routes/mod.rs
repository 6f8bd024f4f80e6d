pub mod health;
pub mod jobs;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};

use crate::board::handlers;
use crate::resume::handlers::handle_generate_resume;
use crate::state::AppState;

/// Request bodies above this are rejected before validation. Leaves room over
/// the 5 MB resume cap so oversize uploads still get a field-level error.
const BODY_LIMIT_BYTES: usize = 8 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Upstream proxy
        .route("/api/jobs", get(jobs::handle_proxy_jobs))
        // Board session
        .route("/api/board", get(handlers::handle_get_board))
        .route("/api/board/filters", patch(handlers::handle_update_filters))
        .route("/api/board/page/next", post(handlers::handle_next_page))
        .route(
            "/api/board/page/previous",
            post(handlers::handle_previous_page),
        )
        .route("/api/board/jobs/:id", get(handlers::handle_job_detail))
        .route(
            "/api/board/jobs/:id/apply",
            get(handlers::handle_apply_check),
        )
        .route(
            "/api/board/jobs/:id/applications",
            post(handlers::handle_submit_application),
        )
        .route(
            "/api/board/applications",
            get(handlers::handle_list_applications),
        )
        .route("/api/board/analysis", get(handlers::handle_analysis))
        // Resume generator
        .route("/api/resume", post(handle_generate_resume))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .with_state(state)
}
