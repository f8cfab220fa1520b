//! Profile → HTML → PDF (+ DOCX for résumés), recorded in the user's file index.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::info;

use crate::errors::AppError;
use crate::files::naming::{generated_file_name, is_valid_template_id};
use crate::files::{FileExt, FileRegistry};
use crate::models::profile::Profile;
use crate::render::docx::write_docx;
use crate::render::{DocType, PdfRenderer, TemplateRenderer};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    pub doc_type: DocType,
    pub template_id: String,
    /// Free-form values for cover letters (company, job title, ...).
    #[serde(default)]
    pub variables: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderResponse {
    pub pdf_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docx_url: Option<String>,
}

/// Collaborators needed to produce documents.
pub struct RenderDeps<'a> {
    pub templates: &'a TemplateRenderer,
    pub pdf: &'a dyn PdfRenderer,
    pub registry: &'a FileRegistry,
}

/// Renders one document set for `email` from an already-loaded profile.
///
/// Files are named with the current Unix time in milliseconds, so repeated
/// requests never overwrite earlier output.
pub async fn render_document(
    deps: RenderDeps<'_>,
    email: &str,
    profile: &Profile,
    request: RenderRequest,
) -> Result<RenderResponse, AppError> {
    if !is_valid_template_id(&request.template_id) {
        return Err(AppError::Validation(format!(
            "templateId '{}' may only contain letters, digits, '_' and '-'",
            request.template_id
        )));
    }

    let out_dir = deps.registry.ensure_user_dir(email).await?;
    let version = chrono::Utc::now().timestamp_millis();
    let kind = request.doc_type.kind();

    let context = match request.doc_type {
        DocType::Resume => json!({ "profile": profile }),
        DocType::CoverLetter => json!({
            "profile": profile,
            "vars": request.variables.unwrap_or_default(),
        }),
    };
    let html = deps
        .templates
        .render(&request.template_id, request.doc_type, &context)
        .await?;

    let pdf_name = generated_file_name(kind, &request.template_id, version, FileExt::Pdf);
    deps.pdf.render_pdf(html, &out_dir.join(&pdf_name)).await?;
    deps.registry
        .record(email, &pdf_name, Some(profile.revision))
        .await?;

    let docx_url = match request.doc_type {
        DocType::Resume => {
            let docx_name = generated_file_name(kind, &request.template_id, version, FileExt::Docx);
            write_docx(&profile.sections, &out_dir.join(&docx_name)).await?;
            deps.registry
                .record(email, &docx_name, Some(profile.revision))
                .await?;
            Some(deps.registry.public_url(email, &docx_name)?)
        }
        DocType::CoverLetter => None,
    };

    info!(
        "Rendered {} '{}' v{} for {} (profile revision {})",
        kind.prefix(),
        request.template_id,
        version,
        email,
        profile.revision
    );

    Ok(RenderResponse {
        pdf_url: deps.registry.public_url(email, &pdf_name)?,
        docx_url,
    })
}
