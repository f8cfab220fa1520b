use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::identity::UserEmail;
use crate::models::profile::Profile;
use crate::profile::store::upsert_profile;
use crate::profile::validation::validate_sections;
use crate::state::AppState;
use crate::wizard::{advance, to_upsert_payload, ProfileForm, StepInput, WizardState};

#[derive(Debug, Deserialize)]
pub struct AdvanceRequest {
    #[serde(default)]
    pub state: WizardState,
    pub input: StepInput,
}

/// POST /resume/wizard/advance
pub async fn handle_advance(
    Json(request): Json<AdvanceRequest>,
) -> Result<Json<WizardState>, AppError> {
    let next = advance(request.state, request.input)?;
    Ok(Json(next))
}

/// POST /resume/wizard/submit
///
/// Converts the wizard form into an upsert payload and stores it.
pub async fn handle_submit(
    State(state): State<AppState>,
    email: UserEmail,
    Json(form): Json<ProfileForm>,
) -> Result<Json<Profile>, AppError> {
    let payload = to_upsert_payload(&form);
    validate_sections(&payload)?;
    let profile = upsert_profile(&state.db, email.or_demo(), payload).await?;
    Ok(Json(profile))
}
