//! Colab HTTP client.

use reqwest::{Client, RequestBuilder, Response, Url};
use tracing::debug;

use chatcut_models::RemoteEndpoint;

use crate::config::ColabConfig;
use crate::error::{ProxyError, ProxyResult};

/// Client for the remote Colab processing server.
///
/// Holds no per-job state: every operation is one independent request, so
/// a single client can drive many jobs concurrently. Cloning is cheap and
/// shares the connection pool.
#[derive(Debug, Clone)]
pub struct ColabClient {
    pub(crate) http: Client,
    pub(crate) config: ColabConfig,
}

impl ColabClient {
    /// Create a new client from configuration.
    pub fn new(config: ColabConfig) -> ProxyResult<Self> {
        let http = Client::builder()
            .connect_timeout(config.connect_timeout)
            .user_agent(concat!("chatcut-colab/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProxyError::config_error(e.to_string()))?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> ProxyResult<Self> {
        Self::new(ColabConfig::from_env())
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ColabConfig {
        &self.config
    }

    /// The endpoint configured via `COLAB_URL`, if any.
    pub fn default_endpoint(&self) -> ProxyResult<&RemoteEndpoint> {
        self.config
            .default_endpoint
            .as_ref()
            .ok_or_else(|| ProxyError::config_error("no Colab URL given and COLAB_URL is not set"))
    }

    /// URL for `route` on `endpoint` with `segment` appended as a single
    /// percent-encoded path segment.
    pub(crate) fn route_url(
        &self,
        endpoint: &RemoteEndpoint,
        route: &str,
        segment: &str,
    ) -> ProxyResult<Url> {
        let base = endpoint.join(route);
        let mut url = Url::parse(&base)
            .map_err(|e| ProxyError::config_error(format!("invalid Colab URL {base}: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| ProxyError::config_error(format!("invalid Colab URL {base}")))?
            .pop_if_empty()
            .push(segment);
        Ok(url)
    }

    /// Send a request, mapping transport failures to `NETWORK_ERROR`.
    pub(crate) async fn send(&self, request: RequestBuilder, url: &str) -> ProxyResult<Response> {
        debug!(url = %url, "Sending request to Colab server");
        request.send().await.map_err(|e| {
            debug!(url = %url, error = %e, "Colab request failed in transport");
            ProxyError::network(&e)
        })
    }
}
