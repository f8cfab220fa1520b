//! Résumé tailoring against a job description.
//!
//! The tailoring logic itself lives outside this service. Callers only see the
//! `Tailor` trait; `AppState` carries an `Arc<dyn Tailor>` chosen at startup:
//! `HttpTailor` when `TAILOR_URL` is set, else `SubprocessTailor` when
//! `TAILOR_COMMAND` is set, else none (the endpoint answers 501).

pub mod handlers;
pub mod http;
pub mod subprocess;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::config::Config;

pub use http::HttpTailor;
pub use subprocess::SubprocessTailor;

#[derive(Debug, Error)]
pub enum TailorError {
    #[error("failed to start tailoring process: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("tailoring process I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("tailoring process exited with {status}")]
    Exit { status: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("tailoring service error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// Wire payload shared by both backends.
#[derive(Debug, Serialize)]
pub(crate) struct TailorPayload<'a> {
    pub resume: &'a str,
    pub jd: &'a str,
}

#[async_trait]
pub trait Tailor: Send + Sync {
    async fn tailor(&self, resume_text: &str, job_description: &str)
        -> Result<String, TailorError>;
}

/// Picks the backend configured for this deployment, if any.
pub fn from_config(config: &Config) -> Option<Arc<dyn Tailor>> {
    if let Some(url) = &config.tailor_url {
        return Some(Arc::new(HttpTailor::new(url.clone())));
    }
    config
        .tailor_command
        .as_deref()
        .and_then(SubprocessTailor::from_command_line)
        .map(|t| Arc::new(t) as Arc<dyn Tailor>)
}
