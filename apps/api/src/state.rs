use std::sync::Arc;

use sqlx::PgPool;

use crate::files::FileRegistry;
use crate::render::{PdfRenderer, TemplateRenderer};
use crate::tailor::Tailor;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub templates: Arc<TemplateRenderer>,
    /// Pluggable PDF engine. Default: `ChromePdfRenderer`.
    pub pdf: Arc<dyn PdfRenderer>,
    pub registry: Arc<FileRegistry>,
    /// `None` when neither `TAILOR_URL` nor `TAILOR_COMMAND` is configured.
    pub tailor: Option<Arc<dyn Tailor>>,
}
