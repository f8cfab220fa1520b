use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, error};

use crate::tailor::{Tailor, TailorError, TailorPayload};

/// Runs an external agent: JSON `{"resume", "jd"}` on stdin, tailored text on stdout.
///
/// There is no timeout. The child is killed if the calling future is dropped.
#[derive(Debug, Clone)]
pub struct SubprocessTailor {
    program: String,
    args: Vec<String>,
}

impl SubprocessTailor {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Splits a whitespace-separated command line; `None` if it is blank.
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self::new(program, parts.collect()))
    }
}

#[async_trait]
impl Tailor for SubprocessTailor {
    async fn tailor(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<String, TailorError> {
        let payload = serde_json::to_vec(&TailorPayload {
            resume: resume_text,
            jd: job_description,
        })
        .map_err(|e| TailorError::Io(e.into()))?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(TailorError::Spawn)?;

        // Feed stdin concurrently so a child that streams output early cannot deadlock us.
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| TailorError::Io(std::io::Error::other("child stdin unavailable")))?;
        let writer = tokio::spawn(async move {
            stdin.write_all(&payload).await?;
            stdin.shutdown().await
        });

        let output = child.wait_with_output().await?;
        let write_result = writer
            .await
            .map_err(|e| TailorError::Io(std::io::Error::other(e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!(
                "Tailoring process {} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            );
            return Err(TailorError::Exit {
                status: output.status.to_string(),
            });
        }
        write_result?;

        let tailored = String::from_utf8_lossy(&output.stdout).trim_end().to_string();
        debug!("Tailoring process returned {} bytes", tailored.len());
        Ok(tailored)
    }
}
