//! Caller-side polling loop.
//!
//! Polls until the job reaches a terminal status or the deadline passes.
//! Transient `NETWORK_ERROR` failures are polled through (tunnels drop
//! briefly); every other failure ends the wait immediately, as does
//! `not_found`, so a server that forgot the job is not hammered.

use tokio::time::{sleep, Instant};
use tracing::{info, warn};

use chatcut_colab::{ColabClient, JobProgress, ProxyError, ProxyResult, RemoteEndpoint};

use crate::config::WaitConfig;

/// How a wait ended when no permanent error occurred.
#[derive(Debug)]
pub enum WaitOutcome {
    /// The job reached `complete` or `not_found`
    Finished(JobProgress),
    /// The deadline passed first
    DeadlineExceeded {
        last: Option<JobProgress>,
        last_error: Option<ProxyError>,
        attempts: u32,
    },
}

/// Poll `job_id` at `config.poll_interval` until it settles.
pub async fn wait_for_job(
    client: &ColabClient,
    job_id: &str,
    endpoint: &RemoteEndpoint,
    config: &WaitConfig,
) -> ProxyResult<WaitOutcome> {
    let deadline = Instant::now() + config.deadline;
    let mut attempts = 0u32;
    let mut last = None;
    let mut last_error = None;

    loop {
        attempts += 1;
        match client.poll(job_id, endpoint).await {
            Ok(progress) if progress.is_terminal() => {
                info!(job_id = %job_id, status = %progress.status, attempts, "Job settled");
                return Ok(WaitOutcome::Finished(progress));
            }
            Ok(progress) => {
                info!(
                    job_id = %job_id,
                    stage = progress.stage.as_deref().unwrap_or("-"),
                    progress = progress.progress,
                    "{}", progress.message
                );
                last = Some(progress);
                last_error = None;
            }
            Err(e) if e.is_retryable() => {
                warn!(job_id = %job_id, attempts, "Transient poll failure: {}", e);
                last_error = Some(e);
            }
            Err(e) => return Err(e),
        }

        if Instant::now() + config.poll_interval > deadline {
            warn!(job_id = %job_id, attempts, "Gave up waiting for job");
            return Ok(WaitOutcome::DeadlineExceeded {
                last,
                last_error,
                attempts,
            });
        }
        sleep(config.poll_interval).await;
    }
}
