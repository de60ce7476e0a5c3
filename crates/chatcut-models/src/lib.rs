//! Shared data models for the ChatCut remote processing proxy.
//!
//! This crate provides Serde-serializable types for:
//! - Normalized remote endpoints (tunnel URLs)
//! - Remote job status vocabulary
//! - Job submission and progress records
//! - Trim ranges attached to submissions
//! - Health probe reports

pub mod endpoint;
pub mod error;
pub mod health;
pub mod job;
pub mod job_status;
pub mod trim;

// Re-export common types
pub use endpoint::RemoteEndpoint;
pub use error::{ModelError, ModelResult};
pub use health::HealthReport;
pub use job::{JobProgress, SubmittedJob};
pub use job_status::JobStatus;
pub use trim::TrimSpec;
