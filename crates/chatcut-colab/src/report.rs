//! Flat report records for the REST layer.
//!
//! The UI consumes one record shape per operation with an `error` key
//! holding the taxonomy code. These types fold a typed result into that
//! shape so handlers only serialize.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use chatcut_models::{JobProgress, JobStatus, SubmittedJob};

use crate::error::{ErrorCode, ProxyError, ProxyResult};

/// Outcome of a submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitReport {
    pub job_id: Option<String>,
    pub status: JobStatus,
    pub message: String,
    pub error: Option<ErrorCode>,
}

impl SubmitReport {
    pub fn from_result(result: &ProxyResult<SubmittedJob>) -> Self {
        match result {
            Ok(job) => Self {
                job_id: Some(job.job_id.clone()),
                status: job.status.clone(),
                message: job.message.clone(),
                error: None,
            },
            Err(e) => Self {
                job_id: None,
                status: JobStatus::Error,
                message: e.to_string(),
                error: Some(e.code()),
            },
        }
    }
}

/// Outcome of a progress poll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressReport {
    pub job_id: String,
    pub status: JobStatus,
    pub stage: Option<String>,
    pub progress: u8,
    pub message: String,
    pub output_path: Option<PathBuf>,
    pub error: Option<ErrorCode>,
}

impl ProgressReport {
    pub fn from_result(job_id: &str, result: &ProxyResult<JobProgress>) -> Self {
        match result {
            Ok(progress) => Self {
                job_id: progress.job_id.clone(),
                status: progress.status.clone(),
                stage: progress.stage.clone(),
                progress: progress.progress,
                message: progress.message.clone(),
                output_path: progress.output_path.clone(),
                error: None,
            },
            Err(e) => {
                let (stage, progress) = match e {
                    ProxyError::JobFailed {
                        stage, progress, ..
                    } => (stage.clone(), *progress),
                    _ => (None, 0),
                };
                Self {
                    job_id: job_id.to_string(),
                    status: JobStatus::Error,
                    stage,
                    progress,
                    message: e.to_string(),
                    output_path: None,
                    error: Some(e.code()),
                }
            }
        }
    }
}
