// Document rendering: Handlebars HTML templates, headless-browser PDF export,
// DOCX export. Blocking browser work runs inside tokio::task::spawn_blocking.

pub mod docx;
pub mod handlers;
pub mod pdf;
pub mod pipeline;
pub mod templates;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::files::DocumentKind;

pub use pdf::{ChromePdfRenderer, PdfRenderer};
pub use templates::TemplateRenderer;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Template '{template_id}' has no {name}.hbs")]
    TemplateNotFound { template_id: String, name: String },

    #[error("Template error: {0}")]
    Template(#[from] handlebars::RenderError),

    #[error("PDF engine error: {0}")]
    Pdf(String),

    #[error("DOCX error: {0}")]
    Docx(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocType {
    Resume,
    CoverLetter,
}

impl DocType {
    /// Template file stem inside a template directory.
    pub fn template_name(self) -> &'static str {
        match self {
            DocType::Resume => "resume",
            DocType::CoverLetter => "cover",
        }
    }

    pub fn kind(self) -> DocumentKind {
        match self {
            DocType::Resume => DocumentKind::Resume,
            DocType::CoverLetter => DocumentKind::Cover,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateInfo {
    pub id: &'static str,
    pub name: &'static str,
}

/// Templates shipped with the service.
pub const TEMPLATE_CATALOG: &[TemplateInfo] = &[TemplateInfo {
    id: "simple-ats",
    name: "Simple ATS (A4)",
}];
