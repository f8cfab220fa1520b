use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TailorRequest {
    pub resume_text: String,
    pub job_description: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TailorResponse {
    pub tailored_resume: String,
}

/// POST /resume/tailor
///
/// Blocks until the tailoring backend answers; failures surface as a generic 500.
pub async fn handle_tailor(
    State(state): State<AppState>,
    Json(request): Json<TailorRequest>,
) -> Result<Json<TailorResponse>, AppError> {
    let tailor = state.tailor.as_ref().ok_or(AppError::NotImplemented)?;

    if request.resume_text.trim().is_empty() {
        return Err(AppError::Validation("resumeText cannot be empty".to_string()));
    }
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "jobDescription cannot be empty".to_string(),
        ));
    }

    let tailored_resume = tailor
        .tailor(&request.resume_text, &request.job_description)
        .await?;
    Ok(Json(TailorResponse { tailored_resume }))
}
