//! HTML → PDF through a headless Chrome/Chromium instance.
//!
//! Each call launches its own browser and drops it before returning, whether
//! the print succeeded or not; dropping `Browser` terminates the child process.
//! The CDP client is synchronous, so the whole session runs on the blocking pool.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::{Browser, LaunchOptions};
use tracing::debug;
use url::Url;

use crate::render::RenderError;

/// A4 in inches, the unit Chrome's print API expects.
const A4_WIDTH_IN: f64 = 8.27;
const A4_HEIGHT_IN: f64 = 11.69;

/// Seam for the PDF engine. Carried in `AppState` as `Arc<dyn PdfRenderer>`.
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    async fn render_pdf(&self, html: String, out_path: &Path) -> Result<(), RenderError>;
}

#[derive(Debug, Clone, Default)]
pub struct ChromePdfRenderer {
    executable: Option<PathBuf>,
}

impl ChromePdfRenderer {
    pub fn new(executable: Option<PathBuf>) -> Self {
        Self { executable }
    }
}

#[async_trait]
impl PdfRenderer for ChromePdfRenderer {
    async fn render_pdf(&self, html: String, out_path: &Path) -> Result<(), RenderError> {
        let executable = self.executable.clone();
        let pdf = tokio::task::spawn_blocking(move || print_html(executable, &html))
            .await
            .map_err(|e| RenderError::Pdf(format!("spawn_blocking failed in PDF export: {e}")))??;

        tokio::fs::write(out_path, &pdf).await?;
        debug!("Wrote {} byte PDF to {}", pdf.len(), out_path.display());
        Ok(())
    }
}

fn print_html(executable: Option<PathBuf>, html: &str) -> Result<Vec<u8>, RenderError> {
    // The page is loaded from a file so relative asset URLs and large documents behave.
    let page = tempfile::Builder::new()
        .prefix("render-")
        .suffix(".html")
        .tempfile()?;
    std::fs::write(page.path(), html)?;

    let options = LaunchOptions::default_builder()
        .headless(true)
        .path(executable)
        .build()
        .map_err(|e| RenderError::Pdf(format!("invalid browser launch options: {e}")))?;

    let browser = Browser::new(options).map_err(pdf_error)?;
    let tab = browser.new_tab().map_err(pdf_error)?;
    tab.navigate_to(page_url(page.path())?.as_str())
        .map_err(pdf_error)?
        .wait_until_navigated()
        .map_err(pdf_error)?;

    let pdf = tab
        .print_to_pdf(Some(PrintToPdfOptions {
            print_background: Some(true),
            paper_width: Some(A4_WIDTH_IN),
            paper_height: Some(A4_HEIGHT_IN),
            prefer_css_page_size: Some(true),
            ..Default::default()
        }))
        .map_err(pdf_error)?;

    drop(browser);
    Ok(pdf)
}

/// `file://` URL with the path percent-encoded, so spaces or `#` in `TMPDIR` survive.
fn page_url(path: &Path) -> Result<Url, RenderError> {
    Url::from_file_path(path)
        .map_err(|()| RenderError::Pdf(format!("cannot express {} as a URL", path.display())))
}

fn pdf_error(e: anyhow::Error) -> RenderError {
    RenderError::Pdf(format!("{e:#}"))
}
