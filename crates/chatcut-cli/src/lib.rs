//! Calling layer for the Colab proxy.
//!
//! The proxy client answers one request at a time; this crate owns the
//! polling cadence, the wall-clock deadline and process setup
//! (environment, tracing) for the `chatcut` binary.

pub mod config;
pub mod logging;
pub mod wait;

pub use config::WaitConfig;
pub use wait::{wait_for_job, WaitOutcome};
