//! Polling configuration.

use std::time::Duration;

/// How the caller paces polls of a running job.
#[derive(Debug, Clone)]
pub struct WaitConfig {
    /// Delay between consecutive polls
    pub poll_interval: Duration,
    /// Give up once this much time has passed since the first poll
    pub deadline: Duration,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(2),
            deadline: Duration::from_secs(30 * 60), // 30 minutes
        }
    }
}

impl WaitConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            poll_interval: std::env::var("COLAB_POLL_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|s| *s > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.poll_interval),
            deadline: std::env::var("COLAB_WAIT_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.deadline),
        }
    }

    /// Override the values given on the command line. A zero interval is
    /// ignored.
    pub fn with_overrides(mut self, interval_secs: Option<u64>, timeout_secs: Option<u64>) -> Self {
        if let Some(secs) = interval_secs.filter(|s| *s > 0) {
            self.poll_interval = Duration::from_secs(secs);
        }
        if let Some(secs) = timeout_secs {
            self.deadline = Duration::from_secs(secs);
        }
        self
    }
}
