//! HTTP error mapping for API handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use longlist_core::AppError;
use serde_json::json;
use thiserror::Error;

/// Error returned by handlers; renders as a JSON `{"error": ...}` body.
#[derive(Error, Debug)]
pub enum HttpError {
    #[error(transparent)]
    App(#[from] AppError),
}

impl HttpError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            HttpError::App(err) if err.is_client_error() => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            HttpError::App(AppError::StorageMessage(msg)) => {
                tracing::error!("Storage error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Storage error".to_string())
            }
            HttpError::App(err) => {
                tracing::error!("Internal error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, error_message) = self.status_and_message();
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
