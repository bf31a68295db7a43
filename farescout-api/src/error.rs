use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use farescout_core::CoreError;
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    ValidationError(String),
    NotFoundError(String),
    StoreUnavailable(String),
    BadGateway(String),
    Timeout(String),
    InternalServerError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::StoreUnavailable(msg) => {
                tracing::error!("Store unavailable: {}", msg);
                (StatusCode::SERVICE_UNAVAILABLE, "Document store unavailable".to_string())
            }
            AppError::BadGateway(msg) => {
                tracing::error!("Store query failed: {}", msg);
                (StatusCode::BAD_GATEWAY, "Document store query failed".to_string())
            }
            AppError::Timeout(msg) => {
                tracing::error!("Store timeout: {}", msg);
                (StatusCode::GATEWAY_TIMEOUT, "Document store query timed out".to_string())
            }
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ValidationError(msg) => AppError::ValidationError(msg),
            CoreError::NotFound(msg) => AppError::NotFoundError(msg),
            CoreError::StoreUnavailable(msg) => AppError::StoreUnavailable(msg),
            CoreError::StoreError(msg) => AppError::BadGateway(msg),
        }
    }
}
