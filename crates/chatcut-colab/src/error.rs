//! Proxy error taxonomy.
//!
//! Each [`ProxyError`] variant maps to exactly one wire-level
//! [`ErrorCode`]; `Display` on the error is the human-readable message
//! shown to users.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for proxy operations.
pub type ProxyResult<T> = Result<T, ProxyError>;

/// Errors that can occur while talking to the remote server.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Video file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Cannot read video file {}: {reason}", .path.display())]
    FileAccess { path: PathBuf, reason: String },

    #[error(
        "Cannot connect to Colab server ({detail}). \
         Check your internet connection and that the Colab notebook is still running"
    )]
    Network { detail: String, timed_out: bool },

    #[error("Colab server returned status {status}: {body}")]
    ServerError { status: u16, body: String },

    #[error("Colab server did not return a job ID")]
    NoJobId { body: String },

    #[error("Job completed but no download URL was provided (missing `{missing}`)")]
    NoDownloadUrl { missing: &'static str },

    #[error("Processing failed: {reason}")]
    JobFailed {
        reason: String,
        stage: Option<String>,
        progress: u8,
    },

    #[error("Progress check failed: {0}")]
    ProgressCheckFailed(String),

    #[error("Failed to download processed video: {0}")]
    DownloadFailed(String),

    #[error("Invalid client configuration: {0}")]
    Config(String),
}

impl ProxyError {
    pub fn file_access(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::FileAccess {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn progress_check_failed(msg: impl Into<String>) -> Self {
        Self::ProgressCheckFailed(msg.into())
    }

    pub fn download_failed(msg: impl Into<String>) -> Self {
        Self::DownloadFailed(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Classify a transport-level failure from reqwest.
    pub fn network(err: &reqwest::Error) -> Self {
        let detail = if err.is_timeout() {
            "request timed out".to_string()
        } else if err.is_connect() {
            "connection failed".to_string()
        } else {
            err.to_string()
        };
        Self::Network {
            detail,
            timed_out: err.is_timeout(),
        }
    }

    /// Wire-level code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ProxyError::FileNotFound(_) => ErrorCode::FileNotFound,
            ProxyError::FileAccess { .. } => ErrorCode::FileAccessError,
            ProxyError::Network { .. } => ErrorCode::NetworkError,
            ProxyError::ServerError { .. } => ErrorCode::ColabServerError,
            ProxyError::NoJobId { .. } => ErrorCode::NoJobId,
            ProxyError::NoDownloadUrl { .. } => ErrorCode::NoDownloadUrl,
            ProxyError::JobFailed { .. } => ErrorCode::JobFailed,
            ProxyError::ProgressCheckFailed(_) => ErrorCode::ProgressCheckFailed,
            ProxyError::DownloadFailed(_) => ErrorCode::DownloadFailed,
            ProxyError::Config(_) => ErrorCode::ConfigError,
        }
    }

    /// Check if error is transient and worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ProxyError::Network { .. })
    }
}

/// Stable error keys exchanged with callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    FileNotFound,
    FileAccessError,
    NetworkError,
    ColabServerError,
    NoJobId,
    NoDownloadUrl,
    JobFailed,
    ProgressCheckFailed,
    DownloadFailed,
    ConfigError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::FileNotFound => "FILE_NOT_FOUND",
            ErrorCode::FileAccessError => "FILE_ACCESS_ERROR",
            ErrorCode::NetworkError => "NETWORK_ERROR",
            ErrorCode::ColabServerError => "COLAB_SERVER_ERROR",
            ErrorCode::NoJobId => "NO_JOB_ID",
            ErrorCode::NoDownloadUrl => "NO_DOWNLOAD_URL",
            ErrorCode::JobFailed => "JOB_FAILED",
            ErrorCode::ProgressCheckFailed => "PROGRESS_CHECK_FAILED",
            ErrorCode::DownloadFailed => "DOWNLOAD_FAILED",
            ErrorCode::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
