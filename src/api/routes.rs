use crate::api::error::ApiError;
use crate::core::workflow::InvoiceWorkflow;
use crate::domain::model::Outcome;
use crate::utils::error::InvoiceError;
use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, State},
    routing::post,
    Json, Router,
};
use serde_json::json;
use std::path::Path;
use tempfile::NamedTempFile;
use tower_http::{services::ServeDir, trace::TraceLayer};

pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

pub const NOT_INVOICE_MESSAGE: &str = "No invoice detected in image";

#[derive(Clone)]
pub struct AppState {
    pub workflow: InvoiceWorkflow,
}

/// `/process` plus the static frontend as fallback.
pub fn router(state: AppState, frontend_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/process", post(process_invoice))
        .fallback_service(ServeDir::new(frontend_dir.as_ref()))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// POST /process
///
/// Stores the upload in a temporary file for the duration of the request.
/// The file is removed when the handler returns or is cancelled.
async fn process_invoice(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut multipart = multipart.map_err(|_| ApiError::MissingFile)?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        if !content_type.starts_with("image/") {
            return Err(InvoiceError::UnsupportedMediaType { content_type }.into());
        }

        let bytes = field.bytes().await?;
        tracing::info!("Received upload ({}, {} bytes)", content_type, bytes.len());

        let upload = store_upload(&bytes).await?;
        let outcome = state.workflow.run(upload.path()).await?;

        let body = match outcome {
            Outcome::Invoice(properties) => properties.to_json(),
            Outcome::NotInvoice => json!({ "error": NOT_INVOICE_MESSAGE }),
        };
        return Ok(Json(body));
    }

    Err(ApiError::MissingFile)
}

async fn store_upload(bytes: &[u8]) -> Result<NamedTempFile, ApiError> {
    let file = tempfile::Builder::new()
        .prefix("invoice-")
        .suffix(".jpg")
        .tempfile()
        .map_err(|e| ApiError::Internal(format!("cannot create temporary file: {}", e)))?;

    tokio::fs::write(file.path(), bytes)
        .await
        .map_err(|e| ApiError::Internal(format!("cannot write temporary file: {}", e)))?;

    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::BackendKind;
    use crate::domain::ports::{Inferencer, ResponseFormat};
    use crate::utils::error::Result;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use std::collections::VecDeque;
    use std::path::PathBuf;
    use std::sync::Arc;
    use tokio::sync::Mutex;
    use tower::ServiceExt;

    const BOUNDARY: &str = "invoice-test-boundary";

    /// Replays canned completions; remembers each image path and whether it
    /// existed while the call was running.
    struct MockInferencer {
        responses: Mutex<VecDeque<Result<String>>>,
        seen: Mutex<Vec<(PathBuf, bool)>>,
    }

    impl MockInferencer {
        fn new(responses: Vec<Result<String>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Inferencer for MockInferencer {
        fn kind(&self) -> BackendKind {
            BackendKind::LlamaServer
        }

        fn base_url(&self) -> &str {
            "http://mock"
        }

        async fn generate(
            &self,
            _prompt: &str,
            image_path: &Path,
            _response_format: &ResponseFormat,
            _model: Option<&str>,
        ) -> Result<String> {
            self.seen
                .lock()
                .await
                .push((image_path.to_path_buf(), image_path.exists()));
            self.responses
                .lock()
                .await
                .pop_front()
                .unwrap_or(Err(InvoiceError::EmptyCompletion))
        }
    }

    fn app(inferencer: Arc<MockInferencer>, frontend_dir: &Path) -> Router {
        let state = AppState {
            workflow: InvoiceWorkflow::new(inferencer),
        };
        router(state, frontend_dir)
    }

    fn upload_request(field: &str, content_type: &str, data: &[u8]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"test.png\"\r\nContent-Type: {}\r\n\r\n",
                BOUNDARY, field, content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

        Request::builder()
            .method("POST")
            .uri("/process")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_valid_image_returns_properties() {
        let frontend = tempfile::tempdir().unwrap();
        let inferencer = MockInferencer::new(vec![
            Ok(r#"{"invoice": true}"#.to_string()),
            Ok(r#"{"invoice_date": "2024-01-15", "total_amount": 123.45, "currency": "EUR"}"#
                .to_string()),
        ]);

        let response = app(inferencer.clone(), frontend.path())
            .oneshot(upload_request("file", "image/png", b"\x89PNG\r\n"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({"invoice_date": "2024-01-15", "total_amount": 123.45, "currency": "EUR"})
        );

        let seen = inferencer.seen.lock().await;
        assert_eq!(seen.len(), 2);
        assert!(seen.iter().all(|(_, existed)| *existed));
        assert!(seen[0].0.to_string_lossy().ends_with(".jpg"));
        // temporary upload is gone once the request is done
        assert!(!seen[0].0.exists());
    }

    #[tokio::test]
    async fn test_non_invoice_returns_sentinel() {
        let frontend = tempfile::tempdir().unwrap();
        let inferencer = MockInferencer::new(vec![Ok(r#"{"invoice": false}"#.to_string())]);

        let response = app(inferencer.clone(), frontend.path())
            .oneshot(upload_request("file", "image/jpeg", b"\xFF\xD8\xFF\xD9"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({"error": "No invoice detected in image"})
        );
        let seen = inferencer.seen.lock().await;
        assert_eq!(seen.len(), 1);
        assert!(!seen[0].0.exists());
    }

    #[tokio::test]
    async fn test_non_image_returns_400() {
        let frontend = tempfile::tempdir().unwrap();
        let inferencer = MockInferencer::new(vec![]);

        let response = app(inferencer.clone(), frontend.path())
            .oneshot(upload_request("file", "text/plain", b"not an image"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert!(body["detail"]
            .as_str()
            .unwrap()
            .contains("File must be an image"));
        assert!(inferencer.seen.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_returns_422() {
        let frontend = tempfile::tempdir().unwrap();
        let inferencer = MockInferencer::new(vec![]);

        let response = app(inferencer.clone(), frontend.path())
            .oneshot(upload_request("attachment", "image/png", b"\x89PNG"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let response = app(inferencer, frontend.path())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/process")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_malformed_model_answer_returns_500_and_cleans_up() {
        let frontend = tempfile::tempdir().unwrap();
        let inferencer = MockInferencer::new(vec![Ok("not valid json".to_string())]);

        let response = app(inferencer.clone(), frontend.path())
            .oneshot(upload_request("file", "image/png", b"\x89PNG"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert!(body["detail"].as_str().unwrap().contains("Malformed"));

        let seen = inferencer.seen.lock().await;
        assert!(!seen[0].0.exists());
    }

    #[tokio::test]
    async fn test_oversized_upload_returns_413() {
        let frontend = tempfile::tempdir().unwrap();
        let inferencer = MockInferencer::new(vec![]);
        let data = vec![0xFFu8; MAX_UPLOAD_BYTES + 1024];

        let response = app(inferencer.clone(), frontend.path())
            .oneshot(upload_request("file", "image/jpeg", &data))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(inferencer.seen.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_transport_error_returns_500() {
        let frontend = tempfile::tempdir().unwrap();
        let inferencer = MockInferencer::new(vec![Err(InvoiceError::HttpStatusError {
            status: 502,
            body: "bad gateway".to_string(),
        })]);

        let response = app(inferencer, frontend.path())
            .oneshot(upload_request("file", "image/png", b"\x89PNG"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_static_files_served() {
        let frontend = tempfile::tempdir().unwrap();
        std::fs::write(frontend.path().join("index.html"), "<html>scanner</html>").unwrap();
        std::fs::write(frontend.path().join("style.css"), "body {}").unwrap();
        let inferencer = MockInferencer::new(vec![]);

        let response = app(inferencer.clone(), frontend.path())
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.contains("text/html"));

        let response = app(inferencer.clone(), frontend.path())
            .oneshot(Request::builder().uri("/style.css").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.contains("text/css"));

        let response = app(inferencer, frontend.path())
            .oneshot(
                Request::builder()
                    .uri("/nonexistent.css")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
