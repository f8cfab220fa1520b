use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::identity::UserEmail;
use crate::models::profile::{Profile, ProfileSections};
use crate::profile::store::{get_profile, upsert_profile};
use crate::profile::validation::validate_sections;
use crate::state::AppState;

/// POST /resume/profile
pub async fn handle_upsert_profile(
    State(state): State<AppState>,
    email: UserEmail,
    Json(payload): Json<ProfileSections>,
) -> Result<Json<Profile>, AppError> {
    validate_sections(&payload)?;
    let profile = upsert_profile(&state.db, email.or_demo(), payload).await?;
    Ok(Json(profile))
}

/// GET /resume/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    email: UserEmail,
) -> Result<Json<Profile>, AppError> {
    let profile = get_profile(&state.db, email.or_demo()).await?;
    Ok(Json(profile))
}
