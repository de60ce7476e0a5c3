//! Job submission and progress records.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::job_status::JobStatus;

/// A job accepted by the remote server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmittedJob {
    /// Opaque identifier assigned by the server
    pub job_id: String,
    /// Always `started` for a fresh submission
    pub status: JobStatus,
    /// Human-readable message from the server
    pub message: String,
}

/// Normalized snapshot of a remote job.
///
/// Produced by re-fetching from the server; the client never advances
/// `status` on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobProgress {
    pub job_id: String,
    pub status: JobStatus,
    /// Free-text progress label (e.g. `tracking`, `rendering`)
    pub stage: Option<String>,
    /// Progress percentage (0-100)
    pub progress: u8,
    pub message: String,
    /// Local artifact path, set once a complete job has been downloaded
    pub output_path: Option<PathBuf>,
}

impl JobProgress {
    /// Check if the job is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Clamp a loosely-typed remote progress value into 0-100.
pub fn clamp_progress(value: f64) -> u8 {
    if value.is_nan() {
        0
    } else {
        value.round().clamp(0.0, 100.0) as u8
    }
}
