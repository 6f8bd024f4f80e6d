use axum::{
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::resume::pdf::render_resume;
use crate::resume::ResumeForm;

/// POST /api/resume
///
/// Renders the submitted form and returns it as a PDF download.
pub async fn handle_generate_resume(Json(form): Json<ResumeForm>) -> Result<Response, AppError> {
    form.validate()?;
    let file_name = form.file_name();

    let bytes = tokio::task::spawn_blocking(move || render_resume(&form))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in resume render: {e}")))?
        .map_err(|e| AppError::Pdf(e.to_string()))?;

    info!("Generated {file_name} ({} bytes)", bytes.len());

    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{file_name}\""))
        .map_err(|e| AppError::Internal(e.into()))?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}
