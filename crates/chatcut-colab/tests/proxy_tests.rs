//! HTTP contract tests against a mocked Colab server.

use std::net::TcpListener;
use std::path::Path;
use std::time::Duration;

use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use chatcut_colab::{
    ColabClient, ColabConfig, ErrorCode, JobStatus, ProgressReport, ProxyError, RemoteEndpoint,
    SubmitReport, TrimSpec,
};

struct Fixture {
    client: ColabClient,
    output: TempDir,
    sources: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self::with_timeout(Duration::from_secs(5))
    }

    fn with_timeout(timeout: Duration) -> Self {
        let output = TempDir::new().unwrap();
        let sources = TempDir::new().unwrap();
        let config = ColabConfig::default()
            .with_output_dir(output.path())
            .with_timeout(timeout);
        Self {
            client: ColabClient::new(config).unwrap(),
            output,
            sources,
        }
    }

    fn video(&self) -> std::path::PathBuf {
        let path = self.sources.path().join("source.mp4");
        std::fs::write(&path, b"fake video content").unwrap();
        path
    }
}

fn endpoint(server: &MockServer) -> RemoteEndpoint {
    RemoteEndpoint::normalize(&server.uri())
}

/// An endpoint nothing listens on, so connections are refused.
fn closed_endpoint() -> RemoteEndpoint {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    RemoteEndpoint::normalize(&format!("http://127.0.0.1:{port}"))
}

fn assert_network_error(err: &ProxyError) {
    assert_eq!(err.code(), ErrorCode::NetworkError, "got {err:?}");
    assert!(err.to_string().to_lowercase().contains("connect"));
    assert!(err.is_retryable());
}

// ---------------------------------------------------------------------------
// Submit
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_submit_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/start"))
        .and(body_string_contains("zoom on the person"))
        .and(body_string_contains("fake video content"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "job_id": "abc12345",
            "status": "started",
            "message": "Processing started"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let fx = Fixture::new();
    let result = fx
        .client
        .submit(fx.video(), "zoom on the person", &endpoint(&server), None)
        .await;

    let report = SubmitReport::from_result(&result);
    assert_eq!(report.job_id.as_deref(), Some("abc12345"));
    assert_eq!(report.status, JobStatus::Started);
    assert_eq!(report.error, None);
}

#[tokio::test]
async fn test_submit_missing_file_never_hits_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let fx = Fixture::new();
    let err = fx
        .client
        .submit("/nonexistent/file.mp4", "test prompt", &endpoint(&server), None)
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::FileNotFound);
    assert!(err.to_string().to_lowercase().contains("not found"));
    let report = SubmitReport::from_result(&Err(err));
    assert_eq!(report.job_id, None);
    assert_eq!(report.status, JobStatus::Error);
}

#[tokio::test]
async fn test_submit_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/start"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let fx = Fixture::new();
    let result = fx
        .client
        .submit(fx.video(), "test prompt", &endpoint(&server), None)
        .await;

    match &result {
        Err(ProxyError::ServerError { status, body }) => {
            assert_eq!(*status, 500);
            assert_eq!(body, "Internal Server Error");
        }
        other => panic!("expected server error, got {other:?}"),
    }
    let report = SubmitReport::from_result(&result);
    assert_eq!(report.error, Some(ErrorCode::ColabServerError));
    assert_eq!(report.job_id, None);
}

#[tokio::test]
async fn test_submit_client_error_status_is_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/start"))
        .respond_with(ResponseTemplate::new(413).set_body_string("too large"))
        .mount(&server)
        .await;

    let fx = Fixture::new();
    let err = fx
        .client
        .submit(fx.video(), "test prompt", &endpoint(&server), None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::ColabServerError);
}

#[tokio::test]
async fn test_submit_missing_job_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/start"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "started",
            "message": "Processing started"
        })))
        .mount(&server)
        .await;

    let fx = Fixture::new();
    let err = fx
        .client
        .submit(fx.video(), "test prompt", &endpoint(&server), None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::NoJobId);
}

#[tokio::test]
async fn test_submit_connection_refused() {
    let fx = Fixture::new();
    let err = fx
        .client
        .submit(fx.video(), "test prompt", &closed_endpoint(), None)
        .await
        .unwrap_err();
    assert_network_error(&err);
}

#[tokio::test]
async fn test_submit_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/start"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"job_id": "late"}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let fx = Fixture::with_timeout(Duration::from_millis(200));
    let err = fx
        .client
        .submit(fx.video(), "test prompt", &endpoint(&server), None)
        .await
        .unwrap_err();
    assert_network_error(&err);
    assert!(matches!(err, ProxyError::Network { timed_out: true, .. }));
}

#[tokio::test]
async fn test_submit_forwards_trim_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/start"))
        .and(body_string_contains("trim_start"))
        .and(body_string_contains("trim_end"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "job_id": "abc12345",
            "status": "started"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let fx = Fixture::new();
    let trim = TrimSpec::new(1.0, 5.0).unwrap();
    let job = fx
        .client
        .submit(fx.video(), "test prompt", &endpoint(&server), Some(&trim))
        .await
        .unwrap();
    assert_eq!(job.job_id, "abc12345");
}

// ---------------------------------------------------------------------------
// Poll
// ---------------------------------------------------------------------------

async fn mount_progress(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/progress/abc12345"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_poll_processing_passes_through() {
    let server = MockServer::start().await;
    mount_progress(
        &server,
        json!({
            "status": "processing",
            "stage": "tracking",
            "progress": 45,
            "message": "Tracking frame 100/200..."
        }),
    )
    .await;

    let fx = Fixture::new();
    let progress = fx.client.poll("abc12345", &endpoint(&server)).await.unwrap();
    assert_eq!(progress.status, JobStatus::Processing);
    assert_eq!(progress.stage.as_deref(), Some("tracking"));
    assert_eq!(progress.progress, 45);
    assert_eq!(progress.message, "Tracking frame 100/200...");
    assert_eq!(progress.output_path, None);
    assert!(!progress.is_terminal());
}

#[tokio::test]
async fn test_poll_complete_downloads_once() {
    let server = MockServer::start().await;
    mount_progress(
        &server,
        json!({
            "status": "complete",
            "stage": "complete",
            "progress": 100,
            "message": "Processing complete!",
            "download_url": "/download/x.mp4",
            "filename": "x.mp4"
        }),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/download/x.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"processed bytes".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let fx = Fixture::new();
    let progress = fx.client.poll("abc12345", &endpoint(&server)).await.unwrap();

    assert_eq!(progress.status, JobStatus::Complete);
    assert_eq!(progress.progress, 100);
    let output = progress.output_path.expect("output path");
    assert!(output.is_absolute());
    assert!(output.ends_with("abc12345_x.mp4"));
    assert!(output.starts_with(fx.output.path().canonicalize().unwrap()));
    assert_eq!(std::fs::read(&output).unwrap(), b"processed bytes");
}

#[tokio::test]
async fn test_poll_complete_is_repeatable() {
    let server = MockServer::start().await;
    mount_progress(
        &server,
        json!({
            "status": "complete",
            "download_url": "/download/x.mp4",
            "filename": "x.mp4"
        }),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/download/x.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"processed bytes".to_vec()))
        .expect(2)
        .mount(&server)
        .await;

    let fx = Fixture::new();
    let first = fx.client.poll("abc12345", &endpoint(&server)).await.unwrap();
    let second = fx.client.poll("abc12345", &endpoint(&server)).await.unwrap();
    assert_eq!(first.output_path, second.output_path);
    assert_eq!(
        std::fs::read(second.output_path.unwrap()).unwrap(),
        b"processed bytes"
    );
}

#[tokio::test]
async fn test_poll_complete_with_absolute_download_url() {
    let server = MockServer::start().await;
    mount_progress(
        &server,
        json!({
            "status": "complete",
            "download_url": format!("{}/files/out.mp4", server.uri()),
            "filename": "out.mp4"
        }),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/files/out.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"abs".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let fx = Fixture::new();
    let progress = fx.client.poll("abc12345", &endpoint(&server)).await.unwrap();
    assert!(progress.output_path.unwrap().ends_with("abc12345_out.mp4"));
}

#[tokio::test]
async fn test_poll_complete_without_download_url() {
    let server = MockServer::start().await;
    mount_progress(
        &server,
        json!({
            "status": "complete",
            "stage": "complete",
            "progress": 100,
            "message": "Processing complete!"
        }),
    )
    .await;

    let fx = Fixture::new();
    let result = fx.client.poll("abc12345", &endpoint(&server)).await;
    let report = ProgressReport::from_result("abc12345", &result);

    assert_eq!(report.status, JobStatus::Error);
    assert_eq!(report.error, Some(ErrorCode::NoDownloadUrl));
    assert!(report.message.contains("download URL"));
    assert!(report.message.contains("download_url"));
}

#[tokio::test]
async fn test_poll_complete_without_filename() {
    let server = MockServer::start().await;
    mount_progress(
        &server,
        json!({"status": "complete", "download_url": "/download/x.mp4"}),
    )
    .await;

    let fx = Fixture::new();
    let err = fx.client.poll("abc12345", &endpoint(&server)).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::NoDownloadUrl);
    assert!(err.to_string().contains("filename"));
}

#[tokio::test]
async fn test_poll_download_rejected_propagates() {
    let server = MockServer::start().await;
    mount_progress(
        &server,
        json!({
            "status": "complete",
            "download_url": "/download/gone.mp4",
            "filename": "gone.mp4"
        }),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/download/gone.mp4"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fx = Fixture::new();
    let err = fx.client.poll("abc12345", &endpoint(&server)).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::DownloadFailed);
}

#[tokio::test]
async fn test_poll_download_unreachable_propagates_network_error() {
    let server = MockServer::start().await;
    let dead = closed_endpoint();
    mount_progress(
        &server,
        json!({
            "status": "complete",
            "download_url": dead.join("/download/x.mp4"),
            "filename": "x.mp4"
        }),
    )
    .await;

    let fx = Fixture::new();
    let err = fx.client.poll("abc12345", &endpoint(&server)).await.unwrap_err();
    assert_network_error(&err);
}

#[tokio::test]
async fn test_poll_remote_error() {
    let server = MockServer::start().await;
    mount_progress(
        &server,
        json!({
            "status": "error",
            "stage": "rendering",
            "progress": 85,
            "error": "Rendering failed",
            "message": "Error during rendering"
        }),
    )
    .await;

    let fx = Fixture::new();
    let result = fx.client.poll("abc12345", &endpoint(&server)).await;
    let report = ProgressReport::from_result("abc12345", &result);

    assert_eq!(report.status, JobStatus::Error);
    assert_eq!(report.error, Some(ErrorCode::JobFailed));
    assert_eq!(report.stage.as_deref(), Some("rendering"));
    assert_eq!(report.progress, 85);
    assert!(report.message.to_lowercase().contains("failed"));
    assert!(!result.unwrap_err().is_retryable());
}

#[tokio::test]
async fn test_poll_not_found_passes_through_consistently() {
    let server = MockServer::start().await;
    mount_progress(
        &server,
        json!({"status": "not_found", "error": "Job abc12345 not found"}),
    )
    .await;

    let fx = Fixture::new();
    for _ in 0..2 {
        let result = fx.client.poll("abc12345", &endpoint(&server)).await;
        let report = ProgressReport::from_result("abc12345", &result);
        assert_eq!(report.status, JobStatus::NotFound);
        assert_eq!(report.error, None);
        assert!(report.message.contains("not found"));
    }
}

#[tokio::test]
async fn test_poll_unrecognized_status_is_not_terminal() {
    let server = MockServer::start().await;
    mount_progress(
        &server,
        json!({"status": "warming_up", "progress": 3, "message": "Loading model"}),
    )
    .await;

    let fx = Fixture::new();
    let progress = fx.client.poll("abc12345", &endpoint(&server)).await.unwrap();
    assert_eq!(progress.status, JobStatus::Unrecognized("warming_up".into()));
    assert!(!progress.is_terminal());
    assert_eq!(progress.progress, 3);
}

#[tokio::test]
async fn test_poll_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/progress/abc12345"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fx = Fixture::new();
    let result = fx.client.poll("abc12345", &endpoint(&server)).await;
    let report = ProgressReport::from_result("abc12345", &result);
    assert_eq!(report.status, JobStatus::Error);
    assert_eq!(report.error, Some(ErrorCode::ProgressCheckFailed));
}

#[tokio::test]
async fn test_poll_unparseable_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/progress/abc12345"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>tunnel offline</html>"))
        .mount(&server)
        .await;

    let fx = Fixture::new();
    let err = fx.client.poll("abc12345", &endpoint(&server)).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::ProgressCheckFailed);
}

#[tokio::test]
async fn test_poll_connection_refused() {
    let fx = Fixture::new();
    let result = fx.client.poll("abc12345", &closed_endpoint()).await;
    let report = ProgressReport::from_result("abc12345", &result);
    assert_eq!(report.status, JobStatus::Error);
    assert_eq!(report.error, Some(ErrorCode::NetworkError));
    assert_network_error(&result.unwrap_err());
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_health_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "gpu": "T4"
        })))
        .mount(&server)
        .await;

    let fx = Fixture::new();
    let report = fx.client.check_health(&endpoint(&server)).await;
    assert!(report.healthy);
    assert_eq!(report.status, "ok");
    assert_eq!(report.detail("gpu"), Some(&json!("T4")));
    assert_eq!(report.error, None);
}

#[tokio::test]
async fn test_health_failed_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let fx = Fixture::new();
    let report = fx.client.check_health(&endpoint(&server)).await;
    assert!(!report.healthy);
    assert_eq!(report.status, "error");
    assert!(report.error.unwrap().contains("500"));
}

#[tokio::test]
async fn test_health_unrecognized_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let fx = Fixture::new();
    let report = fx.client.check_health(&endpoint(&server)).await;
    assert!(!report.healthy);
}

#[tokio::test]
async fn test_health_connection_refused() {
    let fx = Fixture::new();
    let report = fx.client.check_health(&closed_endpoint()).await;
    assert!(!report.healthy);
    assert_eq!(report.status, "error");
    assert!(report.error.unwrap().to_lowercase().contains("connect"));
}

#[tokio::test]
async fn test_health_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "ok"}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let fx = Fixture::with_timeout(Duration::from_millis(200));
    let report = fx.client.check_health(&endpoint(&server)).await;
    assert!(!report.healthy);
    assert_eq!(report.status, "error");
    assert!(report.error.unwrap().to_lowercase().contains("connect"));
}

// ---------------------------------------------------------------------------
// Download
// ---------------------------------------------------------------------------

fn leftover_files(dir: &Path) -> Vec<String> {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect(),
        Err(_) => Vec::new(),
    }
}

#[tokio::test]
async fn test_download_relative_url_resolves_against_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/download/processed_video.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"fake video content".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let fx = Fixture::new();
    let result = fx
        .client
        .download(
            "/download/processed_video.mp4",
            &endpoint(&server),
            "test_processed_video.mp4",
        )
        .await
        .expect("downloaded path");

    assert!(result.ends_with("test_processed_video.mp4"));
    assert_eq!(std::fs::read(&result).unwrap(), b"fake video content");
    assert_eq!(leftover_files(fx.output.path()), vec!["test_processed_video.mp4"]);
}

#[tokio::test]
async fn test_download_absolute_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/download/processed_video.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"fake video content".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let fx = Fixture::new();
    let url = format!("{}/download/processed_video.mp4", server.uri());
    let result = fx
        .client
        .download(&url, &closed_endpoint(), "test_processed_video2.mp4")
        .await;
    assert!(result.is_some_and(|p| p.exists()));
}

#[tokio::test]
async fn test_download_creates_missing_output_dir() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/download/a.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"a".to_vec()))
        .mount(&server)
        .await;

    let root = TempDir::new().unwrap();
    let nested = root.path().join("nested").join("output");
    let client = ColabClient::new(ColabConfig::default().with_output_dir(&nested)).unwrap();

    let result = client
        .download("/download/a.mp4", &endpoint(&server), "a.mp4")
        .await
        .unwrap();
    assert_eq!(result, nested.canonicalize().unwrap().join("a.mp4"));
}

#[tokio::test]
async fn test_download_http_error_returns_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/download/processed_video.mp4"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fx = Fixture::new();
    let result = fx
        .client
        .download("/download/processed_video.mp4", &endpoint(&server), "test_video.mp4")
        .await;
    assert!(result.is_none());
    assert!(leftover_files(fx.output.path()).is_empty());
}

#[tokio::test]
async fn test_download_network_error_returns_none() {
    let fx = Fixture::new();
    let result = fx
        .client
        .download("/download/processed_video.mp4", &closed_endpoint(), "test_video.mp4")
        .await;
    assert!(result.is_none());

    let err = fx
        .client
        .fetch_artifact("/download/processed_video.mp4", &closed_endpoint(), "test_video.mp4")
        .await
        .unwrap_err();
    assert_network_error(&err);
}

#[tokio::test]
async fn test_download_timeout_returns_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/download/slow.mp4"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"slow".to_vec())
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let fx = Fixture::with_timeout(Duration::from_millis(200));
    let result = fx
        .client
        .download("/download/slow.mp4", &endpoint(&server), "slow.mp4")
        .await;
    assert!(result.is_none());
    assert!(leftover_files(fx.output.path()).is_empty());
}

#[tokio::test]
async fn test_poll_remote_error_with_structured_detail() {
    let server = MockServer::start().await;
    mount_progress(
        &server,
        json!({
            "status": "error",
            "stage": "rendering",
            "progress": 85,
            "error": {"detail": "CUDA out of memory"}
        }),
    )
    .await;

    let fx = Fixture::new();
    let result = fx.client.poll("abc12345", &endpoint(&server)).await;
    let report = ProgressReport::from_result("abc12345", &result);

    assert_eq!(report.error, Some(ErrorCode::JobFailed));
    assert_eq!(report.stage.as_deref(), Some("rendering"));
    assert_eq!(report.progress, 85);
    assert!(report.message.contains("CUDA out of memory"));
}

#[tokio::test]
async fn test_poll_processing_with_numeric_stage() {
    let server = MockServer::start().await;
    mount_progress(&server, json!({"status": "processing", "stage": 3, "progress": 30})).await;

    let fx = Fixture::new();
    let progress = fx.client.poll("abc12345", &endpoint(&server)).await.unwrap();

    assert_eq!(progress.status, JobStatus::Processing);
    assert_eq!(progress.stage.as_deref(), Some("3"));
    assert_eq!(progress.progress, 30);
}

#[tokio::test]
async fn test_poll_complete_with_non_string_download_url() {
    let server = MockServer::start().await;
    mount_progress(
        &server,
        json!({"status": "complete", "download_url": 42, "filename": "x.mp4"}),
    )
    .await;

    let fx = Fixture::new();
    let err = fx.client.poll("abc12345", &endpoint(&server)).await.unwrap_err();
    assert!(matches!(err, ProxyError::NoDownloadUrl { missing: "download_url" }));
}

#[tokio::test]
async fn test_poll_complete_with_unusable_filename() {
    let server = MockServer::start().await;
    mount_progress(
        &server,
        json!({"status": "complete", "download_url": "/download/abc12345", "filename": ".."}),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/download/abc12345"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"video".to_vec()))
        .expect(0)
        .mount(&server)
        .await;

    let fx = Fixture::new();
    let err = fx.client.poll("abc12345", &endpoint(&server)).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::NoDownloadUrl);
    assert!(matches!(err, ProxyError::NoDownloadUrl { missing: "filename" }));
    assert!(leftover_files(fx.output.path()).is_empty());
}

#[tokio::test]
async fn test_poll_escapes_job_id_in_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/progress/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "processing"})))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/progress/abc%23zzz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "not_found"})))
        .expect(1)
        .mount(&server)
        .await;

    let fx = Fixture::new();
    let progress = fx.client.poll("abc#zzz", &endpoint(&server)).await.unwrap();
    assert_eq!(progress.job_id, "abc#zzz");
    assert_eq!(progress.status, JobStatus::NotFound);
}
