use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::media::MediaError;
use serde::Serialize;

use crate::recipe::ingest::IngestError;
use crate::store::StoreError;

/// Structured error response returned by all endpoints on failure.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Human-readable error description.
    #[schema(example = "steps is required")]
    pub error: String,
    /// Machine-readable error code. One of: `VALIDATION_ERROR`,
    /// `UNSUPPORTED_MEDIA_TYPE`, `PAYLOAD_TOO_LARGE`, `NOT_FOUND`, `CONFLICT`,
    /// `INTERNAL_ERROR`.
    #[schema(example = "VALIDATION_ERROR")]
    pub code: &'static str,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    UnsupportedMediaType(String),
    PayloadTooLarge {
        limit: u64,
    },
    NotFound(String),
    Conflict(String),
    /// Server-side failure. The detail is logged, never sent to the client.
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: msg,
                    code: "VALIDATION_ERROR",
                },
            ),
            AppError::UnsupportedMediaType(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: format!("Invalid file type: {msg}"),
                    code: "UNSUPPORTED_MEDIA_TYPE",
                },
            ),
            AppError::PayloadTooLarge { limit } => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: format!("File exceeds maximum size of {limit} bytes"),
                    code: "PAYLOAD_TOO_LARGE",
                },
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    error: msg,
                    code: "NOT_FOUND",
                },
            ),
            AppError::Conflict(msg) => (
                StatusCode::CONFLICT,
                ErrorBody {
                    error: msg,
                    code: "CONFLICT",
                },
            ),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: "An internal server error occurred".into(),
                        code: "INTERNAL_ERROR",
                    },
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<MediaError> for AppError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::UnsupportedMediaType(msg) => AppError::UnsupportedMediaType(msg),
            MediaError::PayloadTooLarge { limit, .. } => AppError::PayloadTooLarge { limit },
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(msg) => AppError::NotFound(msg),
            StoreError::Conflict(msg) => AppError::Conflict(msg),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::Validation(msg) => AppError::Validation(msg),
            IngestError::ChefNotFound(name) => {
                AppError::NotFound(format!("Chef '{name}' not found"))
            }
            IngestError::Media(e) => e.into(),
            IngestError::Store(e) => e.into(),
        }
    }
}
