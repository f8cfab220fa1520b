use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::identity::UserEmail;
use crate::profile::store::get_profile;
use crate::render::pipeline::{render_document, RenderDeps, RenderRequest, RenderResponse};
use crate::render::{TemplateInfo, TEMPLATE_CATALOG};
use crate::state::AppState;

/// GET /resume/templates
pub async fn handle_list_templates() -> Json<&'static [TemplateInfo]> {
    Json(TEMPLATE_CATALOG)
}

/// POST /resume/render
///
/// Renders the caller's stored profile. Résumés yield a PDF and a DOCX, cover letters a PDF.
pub async fn handle_render(
    State(state): State<AppState>,
    email: UserEmail,
    Json(request): Json<RenderRequest>,
) -> Result<Json<RenderResponse>, AppError> {
    let email = email.or_demo();
    let profile = get_profile(&state.db, email).await?;

    let deps = RenderDeps {
        templates: &state.templates,
        pdf: state.pdf.as_ref(),
        registry: &state.registry,
    };
    let response = render_document(deps, email, &profile, request).await?;
    Ok(Json(response))
}
