//! Job submission.

use std::path::Path;

use reqwest::multipart::{Form, Part};
use reqwest::Body;
use serde_json::Value;
use tracing::warn;

use chatcut_models::{JobStatus, RemoteEndpoint, SubmittedJob, TrimSpec};

use crate::client::ColabClient;
use crate::config::START_PATH;
use crate::error::{ProxyError, ProxyResult};
use crate::file_gate::{check_source_file, SourceFile};
use crate::logging::JobLogger;

const DEFAULT_START_MESSAGE: &str = "Processing started";

impl ColabClient {
    /// Upload `file_path` with `prompt` and start a remote job.
    ///
    /// The file gate runs first, so a missing or unreadable file never
    /// reaches the network. `trim` is forwarded as `trim_start`/`trim_end`
    /// form fields; the server is free to ignore them.
    pub async fn submit(
        &self,
        file_path: impl AsRef<Path>,
        prompt: &str,
        endpoint: &RemoteEndpoint,
        trim: Option<&TrimSpec>,
    ) -> ProxyResult<SubmittedJob> {
        let source = check_source_file(file_path).await?;
        let url = endpoint.join(START_PATH);
        let form = build_form(&source, prompt, trim).await?;

        let request = self
            .http
            .post(&url)
            .multipart(form)
            .timeout(self.config.submit_timeout);
        let response = self.send(request, &url).await?;

        let status = response.status();
        let body = response.text().await.map_err(|e| ProxyError::network(&e))?;

        if !status.is_success() {
            warn!(
                endpoint = %endpoint,
                status = status.as_u16(),
                "Colab server rejected job submission"
            );
            return Err(ProxyError::ServerError {
                status: status.as_u16(),
                body,
            });
        }

        let job = parse_start_response(&body)?;
        JobLogger::new(&job.job_id, "submit", endpoint).log_submitted(&job.message);
        Ok(job)
    }
}

async fn build_form(
    source: &SourceFile,
    prompt: &str,
    trim: Option<&TrimSpec>,
) -> ProxyResult<Form> {
    let file = tokio::fs::File::open(&source.path)
        .await
        .map_err(|e| ProxyError::file_access(&source.path, e.to_string()))?;

    let video = Part::stream_with_length(Body::from(file), source.len)
        .file_name(source.file_name())
        .mime_str(source.mime_type())
        .map_err(|e| ProxyError::config_error(e.to_string()))?;

    let mut form = Form::new()
        .part("video", video)
        .text("prompt", prompt.to_string());

    if let Some(trim) = trim {
        form = form
            .text("trim_start", trim.start_seconds.to_string())
            .text("trim_end", trim.end_seconds.to_string());
    }

    Ok(form)
}

/// Interpret a 2xx body from the start route.
fn parse_start_response(body: &str) -> ProxyResult<SubmittedJob> {
    let value: Value = serde_json::from_str(body).unwrap_or(Value::Null);

    let job_id = match value.get("job_id") {
        Some(Value::String(id)) if !id.trim().is_empty() => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => {
            warn!("Colab server accepted upload without returning a job ID");
            return Err(ProxyError::NoJobId {
                body: body.to_string(),
            });
        }
    };

    let message = value
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_START_MESSAGE)
        .to_string();

    Ok(SubmittedJob {
        job_id,
        status: JobStatus::Started,
        message,
    })
}
