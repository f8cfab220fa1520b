use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::tailor::{Tailor, TailorError, TailorPayload};

const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Deserialize)]
struct TailorResponse {
    tailored_resume: String,
}

#[derive(Debug, Deserialize)]
struct ServiceError {
    error: String,
}

/// Posts `{"resume", "jd"}` to a tailoring service and reads `{"tailored_resume"}`.
/// Retries on 429 and 5xx with exponential backoff.
#[derive(Clone)]
pub struct HttpTailor {
    client: Client,
    url: String,
    base_delay: Duration,
}

impl HttpTailor {
    pub fn new(url: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_else(|_| Client::new()),
            url,
            base_delay: Duration::from_secs(1),
        }
    }

    #[cfg(test)]
    fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// One round trip. 429, 5xx and transport failures come back as retryable.
    async fn send_once(&self, payload: &TailorPayload<'_>) -> Result<String, Attempt> {
        let response = self
            .client
            .post(&self.url)
            .json(payload)
            .send()
            .await
            .map_err(|e| Attempt::Retry(TailorError::Http(e)))?;

        let status = response.status();

        if status.as_u16() == 429 || status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            warn!("Tailoring service returned {}: {}", status, body);
            return Err(Attempt::Retry(TailorError::Api {
                status: status.as_u16(),
                message: body,
            }));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ServiceError>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            return Err(Attempt::Fail(TailorError::Api {
                status: status.as_u16(),
                message,
            }));
        }

        let body: TailorResponse = response
            .json()
            .await
            .map_err(|e| Attempt::Fail(TailorError::Http(e)))?;
        debug!(
            "Tailoring service returned {} bytes",
            body.tailored_resume.len()
        );
        Ok(body.tailored_resume)
    }
}

enum Attempt {
    Retry(TailorError),
    Fail(TailorError),
}

#[async_trait]
impl Tailor for HttpTailor {
    async fn tailor(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<String, TailorError> {
        let payload = TailorPayload {
            resume: resume_text,
            jd: job_description,
        };

        let mut attempt = 1;
        loop {
            match self.send_once(&payload).await {
                Ok(tailored) => return Ok(tailored),
                Err(Attempt::Fail(e)) => return Err(e),
                Err(Attempt::Retry(e)) if attempt >= MAX_RETRIES => return Err(e),
                Err(Attempt::Retry(_)) => {
                    // Exponential backoff: base, 2x base, ...
                    let delay = self.base_delay * (1 << (attempt - 1));
                    warn!(
                        "Tailoring attempt {} failed, retrying after {}ms...",
                        attempt,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
