//! Artifact download.
//!
//! Finished videos are fetched from a URL the server hands back, either
//! absolute or relative to the tunnel endpoint, and written verbatim into
//! the configured output directory.

use std::path::{Path, PathBuf};

use reqwest::Response;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use chatcut_models::RemoteEndpoint;

use crate::client::ColabClient;
use crate::error::{ProxyError, ProxyResult};

impl ColabClient {
    /// Download an artifact, returning its absolute local path.
    ///
    /// Returns `None` on a non-2xx response, transport failure, timeout or
    /// local write failure. Use [`ColabClient::fetch_artifact`] when the
    /// reason matters.
    pub async fn download(
        &self,
        url_or_path: &str,
        endpoint: &RemoteEndpoint,
        local_filename: &str,
    ) -> Option<PathBuf> {
        match self.fetch_artifact(url_or_path, endpoint, local_filename).await {
            Ok(path) => Some(path),
            Err(e) => {
                warn!(
                    url = %url_or_path,
                    error_code = %e.code(),
                    "Artifact download failed: {}", e
                );
                None
            }
        }
    }

    /// Download an artifact, reporting why it failed.
    ///
    /// The body is streamed into a hidden `.part` file next to the target
    /// and renamed into place once complete, so a reader never sees a
    /// truncated artifact. The caller owns the returned file.
    pub async fn fetch_artifact(
        &self,
        url_or_path: &str,
        endpoint: &RemoteEndpoint,
        local_filename: &str,
    ) -> ProxyResult<PathBuf> {
        let file_name = sanitize_file_name(local_filename)?;
        let url = endpoint.resolve(url_or_path);

        let request = self.http.get(&url).timeout(self.config.download_timeout);
        let response = self.send(request, &url).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProxyError::download_failed(format!(
                "server returned status {} for {}",
                status.as_u16(),
                url
            )));
        }

        let output_dir = prepare_output_dir(&self.config.output_dir).await?;
        let target = output_dir.join(&file_name);
        let partial = output_dir.join(format!(".{file_name}.part"));

        let written = match write_body(response, &partial).await {
            Ok(written) => written,
            Err(e) => {
                if let Err(rm) = fs::remove_file(&partial).await {
                    debug!(path = %partial.display(), "Could not remove partial download: {}", rm);
                }
                return Err(e);
            }
        };

        fs::rename(&partial, &target).await.map_err(|e| {
            ProxyError::download_failed(format!(
                "could not move download into {}: {}",
                target.display(),
                e
            ))
        })?;

        info!(
            url = %url,
            path = %target.display(),
            bytes = written,
            "Downloaded artifact"
        );
        Ok(target)
    }
}

/// Strip directory components so a server-chosen name stays inside the
/// output directory.
pub fn sanitize_file_name(name: &str) -> ProxyResult<String> {
    let normalized = name.replace('\\', "/");
    Path::new(&normalized)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| ProxyError::download_failed(format!("invalid local filename {name:?}")))
}

async fn prepare_output_dir(dir: &Path) -> ProxyResult<PathBuf> {
    fs::create_dir_all(dir).await.map_err(|e| {
        ProxyError::download_failed(format!(
            "could not create output directory {}: {}",
            dir.display(),
            e
        ))
    })?;
    fs::canonicalize(dir).await.map_err(|e| {
        ProxyError::download_failed(format!(
            "could not resolve output directory {}: {}",
            dir.display(),
            e
        ))
    })
}

async fn write_body(mut response: Response, path: &Path) -> ProxyResult<u64> {
    let local_err = |e: std::io::Error| {
        ProxyError::download_failed(format!("could not write {}: {}", path.display(), e))
    };

    let mut file = fs::File::create(path).await.map_err(local_err)?;
    let mut written = 0u64;

    while let Some(chunk) = response.chunk().await.map_err(|e| ProxyError::network(&e))? {
        file.write_all(&chunk).await.map_err(local_err)?;
        written += chunk.len() as u64;
    }

    file.flush().await.map_err(local_err)?;
    Ok(written)
}
