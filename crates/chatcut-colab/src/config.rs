//! Client configuration.

use std::path::PathBuf;
use std::time::Duration;

use chatcut_models::RemoteEndpoint;

/// Route that accepts new jobs.
pub const START_PATH: &str = "/start";
/// Route prefix for job progress (`/progress/{job_id}`).
pub const PROGRESS_PATH: &str = "/progress";
/// Liveness/capability route.
pub const HEALTH_PATH: &str = "/health";

/// Colab client configuration.
#[derive(Debug, Clone)]
pub struct ColabConfig {
    /// Default endpoint when the caller does not pass one
    pub default_endpoint: Option<RemoteEndpoint>,
    /// Directory downloaded artifacts are written to
    pub output_dir: PathBuf,
    /// TCP connect timeout for every request
    pub connect_timeout: Duration,
    /// Timeout for the multipart upload (large files)
    pub submit_timeout: Duration,
    /// Timeout for a single progress query
    pub progress_timeout: Duration,
    /// Timeout for the health probe
    pub health_timeout: Duration,
    /// Timeout for an artifact download
    pub download_timeout: Duration,
}

impl Default for ColabConfig {
    fn default() -> Self {
        Self {
            default_endpoint: None,
            output_dir: PathBuf::from("output"),
            connect_timeout: Duration::from_secs(10),
            submit_timeout: Duration::from_secs(300), // 5 minutes for uploads
            progress_timeout: Duration::from_secs(10),
            health_timeout: Duration::from_secs(10),
            download_timeout: Duration::from_secs(300),
        }
    }
}

impl ColabConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            default_endpoint: std::env::var("COLAB_URL")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(|s| RemoteEndpoint::normalize(&s)),
            output_dir: std::env::var("COLAB_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            connect_timeout: secs_from_env("COLAB_CONNECT_TIMEOUT_SECS")
                .unwrap_or(defaults.connect_timeout),
            submit_timeout: secs_from_env("COLAB_SUBMIT_TIMEOUT_SECS")
                .unwrap_or(defaults.submit_timeout),
            progress_timeout: secs_from_env("COLAB_PROGRESS_TIMEOUT_SECS")
                .unwrap_or(defaults.progress_timeout),
            health_timeout: secs_from_env("COLAB_HEALTH_TIMEOUT_SECS")
                .unwrap_or(defaults.health_timeout),
            download_timeout: secs_from_env("COLAB_DOWNLOAD_TIMEOUT_SECS")
                .unwrap_or(defaults.download_timeout),
        }
    }

    /// Set the artifact output directory.
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Set the default endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<RemoteEndpoint>) -> Self {
        self.default_endpoint = Some(endpoint.into());
        self
    }

    /// Apply one timeout to every request kind.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.submit_timeout = timeout;
        self.progress_timeout = timeout;
        self.health_timeout = timeout;
        self.download_timeout = timeout;
        self
    }
}

fn secs_from_env(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}
