//! Local source file validation.
//!
//! Runs before any network call so a request that cannot be fulfilled
//! never occupies a remote job slot.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;

use crate::error::{ProxyError, ProxyResult};

/// A source file that passed the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Size in bytes at check time
    pub len: u64,
}

impl SourceFile {
    /// File name used for the upload part.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "video.mp4".to_string())
    }

    /// MIME type guessed from the extension.
    pub fn mime_type(&self) -> &'static str {
        let ext = self
            .path
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase());
        match ext.as_deref() {
            Some("mp4") | Some("m4v") => "video/mp4",
            Some("mov") => "video/quicktime",
            Some("webm") => "video/webm",
            Some("mkv") => "video/x-matroska",
            Some("avi") => "video/x-msvideo",
            _ => "application/octet-stream",
        }
    }
}

/// Check that `path` exists and is readable by this process.
///
/// Fails with `FILE_NOT_FOUND` when the path is missing and with
/// `FILE_ACCESS_ERROR` when it exists but cannot be read as a file.
/// Read-only: the file is opened and immediately dropped.
pub async fn check_source_file(path: impl AsRef<Path>) -> ProxyResult<SourceFile> {
    let path = path.as_ref();

    let metadata = match fs::metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ProxyError::FileNotFound(path.to_path_buf()));
        }
        Err(e) => return Err(ProxyError::file_access(path, e.to_string())),
    };

    if !metadata.is_file() {
        return Err(ProxyError::file_access(path, "not a regular file"));
    }

    fs::File::open(path)
        .await
        .map_err(|e| ProxyError::file_access(path, e.to_string()))?;

    Ok(SourceFile {
        path: path.to_path_buf(),
        len: metadata.len(),
    })
}
