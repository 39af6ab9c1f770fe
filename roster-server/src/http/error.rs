//! API error types with IntoResponse
//!
//! Every failure body is `{"error": "<short fixed message>"}`. Store causes
//! are logged here and never reach the client.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::repos::StoreError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Statement failed (500, logged)
    Store {
        message: String,
        source: StoreError,
    },

    /// Path id is not an integer (400)
    InvalidId { raw: String },

    /// Body is not the JSON object we expect (400)
    InvalidBody(JsonRejection),
}

impl ApiError {
    pub fn store(message: impl Into<String>, source: StoreError) -> Self {
        Self::Store {
            message: message.into(),
            source,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Store { message, source } => {
                // Log the actual error, return the fixed message
                tracing::error!(
                    operation = source.operation,
                    table = source.table,
                    error = %source,
                    "{}",
                    message
                );
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
            Self::InvalidId { raw } => {
                tracing::debug!(id = %raw, "rejected non-numeric id");
                (StatusCode::BAD_REQUEST, "Invalid id".to_string())
            }
            Self::InvalidBody(rejection) => {
                tracing::debug!(error = %rejection.body_text(), "rejected request body");
                (StatusCode::BAD_REQUEST, "Invalid request body".to_string())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidBody(rejection)
    }
}
