//! Health probe report.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Outcome of a liveness/capability probe against the remote server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub healthy: bool,
    /// Server-reported status, or `error` when unhealthy
    pub status: String,
    /// Capability fields reported by the server (e.g. `gpu`)
    #[serde(flatten)]
    pub details: Map<String, Value>,
    pub error: Option<String>,
}

impl HealthReport {
    /// Report for a server that answered with a usable payload.
    pub fn healthy(status: impl Into<String>, details: Map<String, Value>) -> Self {
        Self {
            healthy: true,
            status: status.into(),
            details,
            error: None,
        }
    }

    /// Report for a server that could not be reached or answered badly.
    pub fn unhealthy(error: impl Into<String>) -> Self {
        Self {
            healthy: false,
            status: "error".to_string(),
            details: Map::new(),
            error: Some(error.into()),
        }
    }

    /// Look up a capability field such as `gpu`.
    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details.get(key)
    }
}
