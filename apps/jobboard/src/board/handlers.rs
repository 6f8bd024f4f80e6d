//! Axum route handlers for the board session.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::board::orchestrator::SearchStatus;
use crate::board::view::{AppliedList, BoardPage, CategoryAnalysis, JobDetail, ALREADY_APPLIED_MESSAGE};
use crate::errors::AppError;
use crate::forms::validation::{validate_application, ApplicationForm, ResumeUpload};
use crate::models::Application;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct FilterUpdate {
    pub query: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DetailQuery {
    #[serde(default)]
    pub more: bool,
}

#[derive(Debug, Serialize)]
pub struct ApplyCheckResponse {
    pub job_id: i64,
    pub already_applied: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/board
pub async fn handle_get_board(State(state): State<AppState>) -> Json<BoardPage> {
    Json(state.board.page().await)
}

/// PATCH /api/board/filters
///
/// Applies the given filters; the refetch happens after the debounce delay.
pub async fn handle_update_filters(
    State(state): State<AppState>,
    Json(update): Json<FilterUpdate>,
) -> (StatusCode, Json<SearchStatus>) {
    let status = state
        .board
        .set_filters(update.query.as_deref(), update.category.as_deref())
        .await;
    (StatusCode::ACCEPTED, Json(status))
}

/// POST /api/board/page/next
pub async fn handle_next_page(State(state): State<AppState>) -> Json<BoardPage> {
    Json(state.board.next_page().await)
}

/// POST /api/board/page/previous
pub async fn handle_previous_page(State(state): State<AppState>) -> Json<BoardPage> {
    Json(state.board.previous_page().await)
}

/// GET /api/board/jobs/:id
pub async fn handle_job_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<DetailQuery>,
) -> Result<Json<JobDetail>, AppError> {
    state
        .board
        .job_detail(id, params.more)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Job {id} is not in the current listing set")))
}

/// GET /api/board/jobs/:id/apply
///
/// Advisory duplicate check before showing the application form.
pub async fn handle_apply_check(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApplyCheckResponse>, AppError> {
    if state.board.has_applied(id).await {
        return Err(AppError::Conflict(ALREADY_APPLIED_MESSAGE.to_string()));
    }
    Ok(Json(ApplyCheckResponse {
        job_id: id,
        already_applied: false,
    }))
}

/// POST /api/board/jobs/:id/applications
///
/// Multipart fields: `name`, `email`, `phone` (optional), `resume` (file).
pub async fn handle_submit_application(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Application>), AppError> {
    let form = read_application_form(multipart).await?;
    let application = validate_application(id, &form).map_err(AppError::InvalidForm)?;

    info!(
        "Application recorded for job {id} (resume: {})",
        application.resume_file_name
    );
    state.board.record_application(application.clone()).await;

    Ok((StatusCode::CREATED, Json(application)))
}

/// GET /api/board/applications
pub async fn handle_list_applications(State(state): State<AppState>) -> Json<AppliedList> {
    Json(state.board.applications().await)
}

/// GET /api/board/analysis
pub async fn handle_analysis(State(state): State<AppState>) -> Json<CategoryAnalysis> {
    Json(state.board.analysis().await)
}

async fn read_application_form(mut multipart: Multipart) -> Result<ApplicationForm, AppError> {
    let mut form = ApplicationForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("name") => form.name = field.text().await?,
            Some("email") => form.email = field.text().await?,
            Some("phone") => form.phone = field.text().await?,
            Some("resume") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().unwrap_or_default().to_string();
                let size = field.bytes().await?.len();
                form.resume = Some(ResumeUpload {
                    file_name,
                    content_type,
                    size,
                });
            }
            _ => {}
        }
    }

    Ok(form)
}
