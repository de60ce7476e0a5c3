//! Structured job logging utilities.
//!
//! Keeps `job_id`, `operation` and `endpoint` fields consistent across
//! every event emitted for a remote job.

use std::path::Path;

use tracing::{debug, info, warn, Span};

use chatcut_models::{JobProgress, RemoteEndpoint};

use crate::error::ProxyError;

/// Job logger for structured logging with consistent formatting.
#[derive(Debug, Clone)]
pub struct JobLogger {
    job_id: String,
    operation: &'static str,
    endpoint: String,
}

impl JobLogger {
    /// Create a logger for one operation on one job.
    pub fn new(job_id: &str, operation: &'static str, endpoint: &RemoteEndpoint) -> Self {
        Self {
            job_id: job_id.to_string(),
            operation,
            endpoint: endpoint.to_string(),
        }
    }

    /// Log a job accepted by the server.
    pub fn log_submitted(&self, message: &str) {
        info!(
            job_id = %self.job_id,
            operation = self.operation,
            endpoint = %self.endpoint,
            "Job submitted: {}", message
        );
    }

    /// Log a normalized progress snapshot.
    pub fn log_progress(&self, progress: &JobProgress) {
        debug!(
            job_id = %self.job_id,
            operation = self.operation,
            status = %progress.status,
            stage = progress.stage.as_deref().unwrap_or("-"),
            progress = progress.progress,
            "Job progress: {}", progress.message
        );
    }

    /// Log a failure surfaced to the caller.
    pub fn log_failure(&self, err: &ProxyError) {
        warn!(
            job_id = %self.job_id,
            operation = self.operation,
            endpoint = %self.endpoint,
            error_code = %err.code(),
            "Job error: {}", err
        );
    }

    /// Log a downloaded artifact.
    pub fn log_completion(&self, output_path: &Path) {
        info!(
            job_id = %self.job_id,
            operation = self.operation,
            output_path = %output_path.display(),
            "Job completed"
        );
    }

    /// Get the job ID.
    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// Get the operation name.
    pub fn operation(&self) -> &str {
        self.operation
    }

    /// Create a tracing span for this job.
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "colab_job",
            job_id = %self.job_id,
            operation = self.operation,
            endpoint = %self.endpoint
        )
    }
}
