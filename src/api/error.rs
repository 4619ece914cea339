use crate::utils::error::InvoiceError;
use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Invoice(#[from] InvoiceError),

    #[error("Invalid multipart body: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Field 'file' is required")]
    MissingFile,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error body the frontend reads `detail` from.
#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            ApiError::Invoice(
                e @ (InvoiceError::UnsupportedMediaType { .. }
                | InvoiceError::ImageNotFound { .. }),
            ) => (StatusCode::BAD_REQUEST, e.user_friendly_message()),
            // reading back our own upload failed, or the model did
            ApiError::Invoice(e) => {
                tracing::error!("Invoice processing failed ({:?}): {}", e.category(), e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            ApiError::Multipart(e) => (e.status(), e.body_text()),
            ApiError::MissingFile => (StatusCode::UNPROCESSABLE_ENTITY, self.to_string()),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
        };

        (status, Json(ErrorResponse { detail })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(error: ApiError) -> StatusCode {
        error.into_response().status()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_of(
                InvoiceError::UnsupportedMediaType {
                    content_type: "text/plain".to_string()
                }
                .into()
            ),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(ApiError::MissingFile), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            status_of(InvoiceError::malformed("expected value", "nope").into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_upload_read_failure_is_server_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error: ApiError = InvoiceError::IoError(io).into();
        assert_eq!(status_of(error), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
