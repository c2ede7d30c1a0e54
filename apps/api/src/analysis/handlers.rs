//! Axum route handlers for the Analysis API.

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use bytes::Bytes;
use tracing::info;

use crate::errors::AppError;
use crate::models::analysis::AnalysisResult;
use crate::state::AppState;

const ALLOWED_EXTENSIONS: [&str; 2] = ["pdf", "docx"];

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/analyze
///
/// Accepts a multipart form with a `file` field (pdf/docx) and an optional
/// `jobDescription` text field. Runs the analyzer and returns the stored
/// result as JSON.
pub async fn handle_analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResult>, AppError> {
    let mut upload: Option<(String, Bytes)> = None;
    let mut job_description = String::new();

    while let Some(field) = multipart.next_field().await? {
        match field.name().unwrap_or("") {
            "file" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let data = field.bytes().await?;
                upload = Some((filename, data));
            }
            "jobDescription" => {
                job_description = field.text().await?;
            }
            _ => {
                // Unknown fields are drained and ignored.
                field.bytes().await?;
            }
        }
    }

    let (filename, data) = upload.ok_or_else(|| AppError::Validation("No file part".to_string()))?;

    if filename.is_empty() {
        return Err(AppError::Validation("No selected file".to_string()));
    }

    if !allowed_file(&filename) {
        return Err(AppError::Validation("File type not allowed".to_string()));
    }

    let result = run_analysis(&state, &filename, &data, &job_description).await?;

    info!(id = %result.id, filename = %filename, "analysis stored");

    state.store.insert(result.clone()).await;

    Ok(Json(result))
}

/// GET /api/results/:analysis_id
pub async fn handle_get_result(
    State(state): State<AppState>,
    Path(analysis_id): Path<String>,
) -> Result<Json<AnalysisResult>, AppError> {
    state
        .store
        .get(&analysis_id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Analysis not found".to_string()))
}

// ────────────────────────────────────────────────────────────────────────────
// Upload processing
// ────────────────────────────────────────────────────────────────────────────

/// Writes the upload into a request-scoped temp directory, waits out the
/// artificial processing delay, and runs the analyzer. The directory and the
/// file in it are removed when the guard drops, on success and error paths
/// alike. The per-request directory also keeps concurrent uploads of
/// same-named files from sharing a path.
async fn run_analysis(
    state: &AppState,
    filename: &str,
    data: &[u8],
    job_description: &str,
) -> Result<AnalysisResult, AppError> {
    let temp_dir = tempfile::tempdir()?;
    let file_path = temp_dir.path().join(sanitize_filename(filename));
    tokio::fs::write(&file_path, data).await?;

    // Simulated processing latency.
    tokio::time::sleep(state.config.analysis_delay).await;

    Ok(state.analyzer.analyze(&file_path, job_description))
}

/// Extension check, case-insensitive on the substring after the final `.`.
/// A filename without a dot has no extension and fails.
fn allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Strips path components and anything outside `[A-Za-z0-9._-]` from a
/// client-supplied filename.
fn sanitize_filename(filename: &str) -> String {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    base.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use tower::ServiceExt;

    use crate::analysis::analyzer::{MockAnalyzer, ThreadRngScores, ATS_RANGE, SCORE_RANGE};
    use crate::config::Config;
    use crate::routes::build_router;
    use crate::state::AppState;
    use crate::store::InMemoryResultStore;

    const BOUNDARY: &str = "api-test-boundary-7MA4YWxkTrZu0gW";

    fn test_app() -> Router {
        let config = Config {
            port: 0,
            rust_log: "info".to_string(),
            analysis_delay: Duration::ZERO,
        };
        let state = AppState {
            store: Arc::new(InMemoryResultStore::new()),
            analyzer: MockAnalyzer::new(Arc::new(ThreadRngScores)),
            config,
        };
        build_router(state)
    }

    fn file_part(filename: &str, content: &[u8]) -> Vec<u8> {
        let mut part = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        )
        .into_bytes();
        part.extend_from_slice(content);
        part.extend_from_slice(b"\r\n");
        part
    }

    fn text_part(name: &str, value: &str) -> Vec<u8> {
        format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"{name}\"\r\n\r\n\
             {value}\r\n"
        )
        .into_bytes()
    }

    fn analyze_request(parts: Vec<Vec<u8>>) -> Request<Body> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(&part);
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/analyze")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn test_valid_pdf_upload_returns_analysis() {
        let app = test_app();
        let request = analyze_request(vec![file_part("resume.pdf", b"%PDF-1.4 fake resume")]);

        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);

        let result: AnalysisResult = serde_json::from_slice(&body).unwrap();
        assert_eq!(result.id.len(), 8);
        assert!(SCORE_RANGE.contains(&result.score));
        assert!(ATS_RANGE.contains(&result.ats_compatibility));
        assert!(!result.keywords.is_empty());
        assert!(!result.improvements.is_empty());
    }

    #[tokio::test]
    async fn test_docx_upload_is_accepted() {
        let app = test_app();
        let request = analyze_request(vec![
            file_part("resume.docx", b"PK fake docx"),
            text_part("jobDescription", "Senior frontend engineer"),
        ]);

        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_file_field_is_rejected() {
        let app = test_app();
        let request = analyze_request(vec![text_part("jobDescription", "some JD")]);

        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(&body[..], br#"{"error":"No file part"}"#);
    }

    #[tokio::test]
    async fn test_empty_filename_is_rejected() {
        let app = test_app();
        let request = analyze_request(vec![file_part("", b"bytes without a name")]);

        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(&body[..], br#"{"error":"No selected file"}"#);
    }

    #[tokio::test]
    async fn test_disallowed_extension_is_rejected() {
        let app = test_app();
        let request = analyze_request(vec![file_part("resume.txt", b"plain text")]);

        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(&body[..], br#"{"error":"File type not allowed"}"#);
    }

    #[tokio::test]
    async fn test_extension_check_is_case_insensitive() {
        let app = test_app();
        let request = analyze_request(vec![file_part("Resume.PDF", b"%PDF-1.4")]);

        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_filename_without_extension_is_rejected() {
        let app = test_app();
        let request = analyze_request(vec![file_part("resume", b"bytes")]);

        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(&body[..], br#"{"error":"File type not allowed"}"#);
    }

    #[tokio::test]
    async fn test_result_is_retrievable_and_reads_are_idempotent() {
        let app = test_app();
        let request = analyze_request(vec![file_part("resume.pdf", b"%PDF-1.4")]);

        let (status, upload_body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        let result: AnalysisResult = serde_json::from_slice(&upload_body).unwrap();

        let uri = format!("/api/results/{}", result.id);
        let (status, first_read) = send(&app, get_request(&uri)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first_read, upload_body);

        let (_, second_read) = send(&app, get_request(&uri)).await;
        assert_eq!(second_read, first_read);
    }

    #[tokio::test]
    async fn test_unknown_id_returns_404() {
        let app = test_app();
        let (status, body) = send(&app, get_request("/api/results/00000000")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(&body[..], br#"{"error":"Analysis not found"}"#);
    }

    #[tokio::test]
    async fn test_sequential_uploads_get_distinct_ids() {
        let app = test_app();

        let (_, first) = send(&app, analyze_request(vec![file_part("resume.pdf", b"a")])).await;
        let (_, second) = send(&app, analyze_request(vec![file_part("resume.pdf", b"b")])).await;

        let first: AnalysisResult = serde_json::from_slice(&first).unwrap();
        let second: AnalysisResult = serde_json::from_slice(&second).unwrap();
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_allowed_file_accepts_pdf_and_docx_only() {
        assert!(allowed_file("resume.pdf"));
        assert!(allowed_file("resume.docx"));
        assert!(allowed_file("Resume.PDF"));
        assert!(allowed_file("archive.tar.docx"));
        assert!(!allowed_file("resume.txt"));
        assert!(!allowed_file("resume"));
        assert!(!allowed_file("resume.docx.exe"));
    }

    #[test]
    fn test_sanitize_filename_strips_paths_and_unsafe_chars() {
        assert_eq!(sanitize_filename("resume.pdf"), "resume.pdf");
        assert_eq!(sanitize_filename("../../etc/evil.pdf"), "evil.pdf");
        assert_eq!(sanitize_filename("C:\\Users\\me\\resume.pdf"), "resume.pdf");
        assert_eq!(sanitize_filename("my resume (final).pdf"), "myresumefinal.pdf");
    }
}
