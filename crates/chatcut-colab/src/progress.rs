//! Progress polling and status normalization.
//!
//! Translates the server's loosely-typed progress payload into a
//! [`JobProgress`]. A `complete` status triggers the artifact download
//! inline, so a successful poll of a finished job carries `output_path`.

use serde::Deserialize;
use serde_json::Value;
use tracing::{warn, Instrument};

use chatcut_models::job::clamp_progress;
use chatcut_models::{JobProgress, JobStatus, RemoteEndpoint};

use crate::client::ColabClient;
use crate::config::PROGRESS_PATH;
use crate::download::sanitize_file_name;
use crate::error::{ProxyError, ProxyResult};
use crate::logging::JobLogger;

/// Progress payload as sent by the server. Every field is optional and
/// loosely typed on the wire; normalization decides which absences are
/// errors.
#[derive(Debug, Default, Deserialize)]
struct RemoteProgress {
    status: Option<Value>,
    stage: Option<Value>,
    progress: Option<Value>,
    message: Option<Value>,
    download_url: Option<Value>,
    filename: Option<Value>,
    error: Option<Value>,
}

impl RemoteProgress {
    fn progress(&self) -> Option<u8> {
        let value = self.progress.as_ref()?;
        let number = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }?;
        Some(clamp_progress(number))
    }

    fn stage(&self) -> Option<String> {
        text(self.stage.as_ref())
    }

    fn error(&self) -> Option<String> {
        text(self.error.as_ref())
    }

    fn message_or(&self, fallback: &str) -> String {
        text(self.message.as_ref()).unwrap_or_else(|| fallback.to_string())
    }
}

/// Free-text field as display text. Non-string values are rendered as
/// JSON; null and blank strings count as absent.
fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Field that must be a non-blank string to be usable.
fn string(value: Option<&Value>) -> Option<&str> {
    value?.as_str().filter(|v| !v.trim().is_empty())
}

impl ColabClient {
    /// Query the server for the state of `job_id`.
    ///
    /// `not_found` is returned as a normal snapshot: the server no longer
    /// knows the job and the caller should stop polling. A remote `error`
    /// becomes [`ProxyError::JobFailed`] with stage and progress preserved.
    pub async fn poll(&self, job_id: &str, endpoint: &RemoteEndpoint) -> ProxyResult<JobProgress> {
        let logger = JobLogger::new(job_id, "poll", endpoint);
        let result = self
            .poll_inner(job_id, endpoint, &logger)
            .instrument(logger.create_span())
            .await;

        match &result {
            Ok(progress) => logger.log_progress(progress),
            Err(e) => logger.log_failure(e),
        }
        result
    }

    async fn poll_inner(
        &self,
        job_id: &str,
        endpoint: &RemoteEndpoint,
        logger: &JobLogger,
    ) -> ProxyResult<JobProgress> {
        let url = self.route_url(endpoint, PROGRESS_PATH, job_id)?;
        let request = self.http.get(url.clone()).timeout(self.config.progress_timeout);
        let response = self.send(request, url.as_str()).await?;

        let status = response.status();
        let body = response.text().await.map_err(|e| ProxyError::network(&e))?;

        if !status.is_success() {
            return Err(ProxyError::progress_check_failed(format!(
                "server returned status {}",
                status.as_u16()
            )));
        }

        let remote: RemoteProgress = serde_json::from_str(&body).map_err(|e| {
            ProxyError::progress_check_failed(format!("unrecognized progress payload: {e}"))
        })?;

        let raw_status = string(remote.status.as_ref())
            .ok_or_else(|| ProxyError::progress_check_failed("progress payload has no status"))?;

        match JobStatus::parse(raw_status) {
            JobStatus::Complete => self.finish(job_id, endpoint, remote, logger).await,
            JobStatus::Error => Err(ProxyError::JobFailed {
                reason: remote
                    .error()
                    .unwrap_or_else(|| remote.message_or("remote job reported an error")),
                stage: remote.stage(),
                progress: remote.progress().unwrap_or(0),
            }),
            JobStatus::NotFound => Ok(JobProgress {
                job_id: job_id.to_string(),
                status: JobStatus::NotFound,
                stage: remote.stage(),
                progress: remote.progress().unwrap_or(0),
                message: remote
                    .error()
                    .unwrap_or_else(|| remote.message_or("Job not found on Colab server")),
                output_path: None,
            }),
            other => {
                if let JobStatus::Unrecognized(raw) = &other {
                    warn!(job_id = %job_id, status = %raw, "Unrecognized job status from Colab server");
                }
                Ok(JobProgress {
                    job_id: job_id.to_string(),
                    stage: remote.stage(),
                    progress: remote.progress().unwrap_or(0),
                    message: remote.message_or(""),
                    status: other,
                    output_path: None,
                })
            }
        }
    }

    async fn finish(
        &self,
        job_id: &str,
        endpoint: &RemoteEndpoint,
        remote: RemoteProgress,
        logger: &JobLogger,
    ) -> ProxyResult<JobProgress> {
        let download_url = string(remote.download_url.as_ref())
            .ok_or(ProxyError::NoDownloadUrl { missing: "download_url" })?;
        let local_filename = string(remote.filename.as_ref())
            .and_then(|filename| artifact_file_name(job_id, filename).ok())
            .ok_or(ProxyError::NoDownloadUrl { missing: "filename" })?;

        let output_path = self
            .fetch_artifact(download_url, endpoint, &local_filename)
            .await?;
        logger.log_completion(&output_path);

        Ok(JobProgress {
            job_id: job_id.to_string(),
            status: JobStatus::Complete,
            stage: remote.stage(),
            progress: remote.progress().unwrap_or(100),
            message: remote.message_or("Processing complete!"),
            output_path: Some(output_path),
        })
    }
}

/// Local name for a job's artifact: `<job_id>_<filename>`.
///
/// Prefixing with the job id keeps concurrent jobs from clobbering each
/// other while staying stable across repeated polls of the same job.
pub fn artifact_file_name(job_id: &str, filename: &str) -> ProxyResult<String> {
    let filename = sanitize_file_name(filename)?;
    let job_id: String = job_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    Ok(format!("{job_id}_{filename}"))
}
