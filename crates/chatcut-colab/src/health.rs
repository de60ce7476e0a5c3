//! Health probing.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use chatcut_models::{HealthReport, RemoteEndpoint};

use crate::client::ColabClient;
use crate::config::HEALTH_PATH;

/// Keys owned by [`HealthReport`] itself; server copies are dropped so
/// they cannot shadow the report's own fields.
const RESERVED_KEYS: [&str; 3] = ["healthy", "status", "error"];

impl ColabClient {
    /// Probe the server's health route.
    ///
    /// Healthy only on a 2xx response carrying a JSON object. Never
    /// fails: connectivity problems yield an unhealthy report whose
    /// `error` mentions the connection.
    pub async fn check_health(&self, endpoint: &RemoteEndpoint) -> HealthReport {
        let url = endpoint.join(HEALTH_PATH);
        let request = self.http.get(&url).timeout(self.config.health_timeout);

        let response = match self.send(request, &url).await {
            Ok(response) => response,
            Err(e) => {
                warn!(endpoint = %endpoint, "Colab health check failed: {}", e);
                return HealthReport::unhealthy(e.to_string());
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(endpoint = %endpoint, status = status.as_u16(), "Colab server unhealthy");
            return HealthReport::unhealthy(format!(
                "Colab server returned status {}",
                status.as_u16()
            ));
        }

        let payload = match response.json::<Value>().await {
            Ok(Value::Object(map)) => map,
            Ok(_) | Err(_) => {
                return HealthReport::unhealthy("Colab server returned an unrecognized health payload");
            }
        };

        let report = report_from_payload(payload);
        debug!(endpoint = %endpoint, status = %report.status, "Colab server healthy");
        report
    }
}

fn report_from_payload(mut payload: Map<String, Value>) -> HealthReport {
    let status = payload
        .get("status")
        .and_then(Value::as_str)
        .unwrap_or("ok")
        .to_string();
    for key in RESERVED_KEYS {
        payload.remove(key);
    }
    HealthReport::healthy(status, payload)
}
