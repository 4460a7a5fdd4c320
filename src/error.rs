use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::store::StoreError;

/// Application-level error type for HTTP handlers.
///
/// Client mistakes and missing records are reported as-is. Everything else
/// becomes [`AppError::Internal`], which logs its source and answers with
/// the handler's generic context message only.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The body was not valid JSON, or did not fit the payload schema.
    #[error(transparent)]
    InvalidPayload(#[from] JsonRejection),

    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    #[error("{context}: {source}")]
    Internal {
        context: &'static str,
        #[source]
        source: StoreError,
    },
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound { entity }
    }
}

/// Downgrade store failures to [`AppError::Internal`].
pub trait InternalContext<T> {
    fn internal(self, context: &'static str) -> AppResult<T>;
}

impl<T> InternalContext<T> for Result<T, StoreError> {
    fn internal(self, context: &'static str) -> AppResult<T> {
        self.map_err(|source| AppError::Internal { context, source })
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InvalidPayload(rejection) => {
                (rejection.status(), "INVALID_PAYLOAD", rejection.body_text())
            }
            AppError::NotFound { entity } => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", format!("{entity} not found"))
            }
            AppError::Internal { context, source } => {
                tracing::error!(error = %source, "❌ {context}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    (*context).to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
