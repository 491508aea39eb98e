//! API error types with HTTP response mapping.
//!
//! This is the single place where failures become HTTP responses; handlers
//! only propagate `ApiError` with `?`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::DomainError;
use entity_store::StoreError;
use thiserror::Error;

/// API-level error type that maps to HTTP responses.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Domain-level failure, e.g. a missing entity.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Infrastructure failure in the entity store.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Domain(err) => {
                let (status, body) = domain_error_to_response(&err);
                (status, body).into_response()
            }
            ApiError::Store(err) => {
                tracing::error!(error = %err, "internal server error");
                let body = serde_json::json!({ "error": err.to_string() });
                (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
            }
        }
    }
}

fn domain_error_to_response(err: &DomainError) -> (StatusCode, String) {
    match err {
        DomainError::NotFound { .. } => (StatusCode::NOT_FOUND, format!("ADVICE: {err}")),
    }
}
