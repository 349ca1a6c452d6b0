pub mod calendar;
pub mod events;
pub mod health;

use axum::{
    Json, Router,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use isocal_core::{IsocalError, ValidationError};
use serde::Serialize;
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the full API router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(health::router())
        .merge(events::router())
        .merge(calendar::router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Standard API error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// Errors returned by handlers, mapped onto HTTP status codes
#[derive(Debug)]
pub enum AppError {
    BadRequest { error: String, details: Option<Value> },
    NotFound(String),
    Internal(anyhow::Error),
}

impl AppError {
    pub fn bad_request(error: impl Into<String>) -> Self {
        AppError::BadRequest {
            error: error.into(),
            details: None,
        }
    }

    pub fn event_not_found() -> Self {
        AppError::NotFound("Event not found".to_string())
    }

    /// 400 with the offending fields listed under `details`.
    pub fn invalid_event(err: &ValidationError) -> Self {
        AppError::BadRequest {
            error: "Invalid event data".to_string(),
            details: serde_json::to_value(&err.issues).ok(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::BadRequest { error, details } => {
                (StatusCode::BAD_REQUEST, ErrorResponse { error, details })
            }
            AppError::NotFound(error) => (
                StatusCode::NOT_FOUND,
                ErrorResponse {
                    error,
                    details: None,
                },
            ),
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: err.to_string(),
                        details: None,
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<IsocalError> for AppError {
    fn from(err: IsocalError) -> Self {
        match err {
            IsocalError::Validation(e) => AppError::invalid_event(&e),
            IsocalError::NotFound(_) => AppError::event_not_found(),
            IsocalError::EmptyCsv => AppError::bad_request("Empty CSV file"),
            IsocalError::Csv(message) => AppError::bad_request(message),
            other => AppError::Internal(other.into()),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::invalid_event(&err)
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::bad_request(err.body_text())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_validation_error_maps_to_400_with_details() {
        let err = ValidationError::single("title", "must not be empty");
        let (status, body) = body_json(IsocalError::Validation(err).into()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid event data");
        assert_eq!(body["details"][0]["field"], "title");
    }

    #[tokio::test]
    async fn test_not_found_maps_to_404() {
        let (status, body) = body_json(IsocalError::NotFound(uuid::Uuid::new_v4()).into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Event not found");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_io_error_maps_to_500() {
        let io = std::io::Error::other("disk full");
        let (status, _) = body_json(IsocalError::Io(io).into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
