//! Remote job status vocabulary.
//!
//! The processing server reports status as a free-form string. The five
//! known values map to dedicated variants; anything else is kept verbatim
//! in [`JobStatus::Unrecognized`] so a server upgrade never breaks parsing.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Job processing status as reported by the remote server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    /// Job accepted, work not yet underway
    Started,
    /// Job is actively being processed
    Processing,
    /// Job finished and its artifact is ready
    Complete,
    /// Job failed (remotely or while fetching its result)
    Error,
    /// Server no longer knows the job (expired or restarted)
    NotFound,
    /// Status string outside the known vocabulary
    Unrecognized(String),
}

impl JobStatus {
    /// Parse a raw status string from the server.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "started" => JobStatus::Started,
            "processing" => JobStatus::Processing,
            "complete" => JobStatus::Complete,
            "error" => JobStatus::Error,
            "not_found" => JobStatus::NotFound,
            _ => JobStatus::Unrecognized(raw.to_string()),
        }
    }

    /// Get string representation of the status.
    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Started => "started",
            JobStatus::Processing => "processing",
            JobStatus::Complete => "complete",
            JobStatus::Error => "error",
            JobStatus::NotFound => "not_found",
            JobStatus::Unrecognized(raw) => raw,
        }
    }

    /// Check if this is a terminal state (no more polling needed).
    ///
    /// Unrecognized statuses are not terminal; the caller's deadline
    /// bounds how long they are polled.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Complete | JobStatus::Error | JobStatus::NotFound
        )
    }
}

impl From<String> for JobStatus {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<JobStatus> for String {
    fn from(value: JobStatus) -> Self {
        match value {
            JobStatus::Unrecognized(raw) => raw,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
