use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::ResumeRow;
use crate::state::AppState;

/// GET /api/v1/resumes/:id
///
/// Returns the stored analysis for one resume.
pub async fn handle_get_resume(
    State(state): State<AppState>,
    resume_id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<ResumeRow>, AppError> {
    let Path(resume_id) = resume_id?;
    let resume = state
        .resumes
        .get_resume(resume_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))?;

    Ok(Json(resume))
}
