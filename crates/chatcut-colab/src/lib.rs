//! Client for the remote Colab video processing server.
//!
//! This crate provides:
//! - Local source file validation before any upload
//! - Job submission (multipart upload of file + prompt)
//! - Progress polling with status normalization
//! - Artifact download from relative or absolute URLs
//! - Health probing of the tunnel endpoint
//!
//! Every call is a single request/response. Retry cadence and deadlines
//! belong to the caller; [`ProxyError::is_retryable`] tells it which
//! failures are worth another attempt.

pub mod client;
pub mod config;
pub mod download;
pub mod error;
pub mod file_gate;
pub mod health;
pub mod logging;
pub mod progress;
pub mod report;
pub mod submit;

pub use client::ColabClient;
pub use config::ColabConfig;
pub use error::{ErrorCode, ProxyError, ProxyResult};
pub use file_gate::{check_source_file, SourceFile};
pub use logging::JobLogger;
pub use report::{ProgressReport, SubmitReport};

pub use chatcut_models::{
    HealthReport, JobProgress, JobStatus, RemoteEndpoint, SubmittedJob, TrimSpec,
};
