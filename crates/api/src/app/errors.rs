//! Error responses.
//!
//! Handlers, extractors and the router fallback all fail with [`ApiError`].
//! Two kinds of failure get a fixed JSON 404 from [`handle`]: a record lookup
//! that missed and a request no route matched. Everything else is handed back
//! untouched and rendered by [`default_response`].

use axum::extract::rejection::JsonRejection;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use shopfront_core::{DomainError, ValidationErrors};

/// Body text for a record lookup miss, whichever model missed.
pub const ENTITY_NOT_FOUND_MESSAGE: &str = "Product Model not found";

/// Body text for an unmatched route. Spelling is part of the wire contract.
pub const ROUTE_NOT_FOUND_MESSAGE: &str = "Incorect route";

/// Every failure a request can end in.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A lookup against the store found no matching record.
    #[error("{entity} not found")]
    ModelNotFound { entity: &'static str },

    /// No route matched the request.
    #[error("no route for {method} {path}")]
    RouteNotFound { method: Method, path: String },

    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("unauthenticated")]
    Unauthenticated,

    #[error(transparent)]
    Json(#[from] JsonRejection),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity } => ApiError::ModelNotFound { entity },
            DomainError::Validation(errors) => ApiError::Validation(errors),
            // Ids only come from path segments; an unparseable one names no record.
            DomainError::InvalidId(_) => ApiError::ModelNotFound { entity: "record" },
        }
    }
}

/// Failure kinds answered with a fixed response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    EntityNotFound,
    RouteNotFound,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

fn is_model(err: &ApiError) -> bool {
    matches!(err, ApiError::ModelNotFound { .. })
}

fn is_route(err: &ApiError) -> bool {
    matches!(err, ApiError::RouteNotFound { .. })
}

/// Which fixed response `err` gets, if any. Entity misses are checked first.
pub fn classify(err: &ApiError) -> Option<ErrorKind> {
    if is_model(err) {
        return Some(ErrorKind::EntityNotFound);
    }
    if is_route(err) {
        return Some(ErrorKind::RouteNotFound);
    }
    None
}

pub fn respond(kind: ErrorKind) -> ErrorResponse {
    let (status, error) = match kind {
        ErrorKind::EntityNotFound => (StatusCode::NOT_FOUND, ENTITY_NOT_FOUND_MESSAGE),
        ErrorKind::RouteNotFound => (StatusCode::NOT_FOUND, ROUTE_NOT_FOUND_MESSAGE),
    };
    ErrorResponse {
        status,
        body: ErrorBody { error },
    }
}

/// `Ok` with the fixed response for a recognized error, otherwise the same
/// error back for the default path.
pub fn handle(err: ApiError) -> Result<ErrorResponse, ApiError> {
    match classify(&err) {
        Some(kind) => Ok(respond(kind)),
        None => Err(err),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let detail = self.to_string();
        match handle(self) {
            Ok(response) => {
                tracing::debug!(error = %detail, status = %response.status, "request failed");
                response.into_response()
            }
            Err(err) => default_response(err),
        }
    }
}

/// Rendering for errors without a fixed response.
pub fn default_response(err: ApiError) -> Response {
    match err {
        ApiError::Validation(errors) => {
            tracing::warn!(%errors, "validation failed");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({
                    "message": "The given data was invalid.",
                    "errors": errors,
                })),
            )
                .into_response()
        }
        ApiError::Unauthenticated => {
            tracing::warn!("unauthenticated request");
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": "Unauthenticated." })),
            )
                .into_response()
        }
        ApiError::Json(rejection) => {
            tracing::warn!(error = %rejection, "request body rejected");
            (
                rejection.status(),
                Json(json!({ "message": rejection.body_text() })),
            )
                .into_response()
        }
        ApiError::Internal(e) => {
            tracing::error!(error = ?e, "internal error");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
        ApiError::ModelNotFound { .. } | ApiError::RouteNotFound { .. } => {
            StatusCode::NOT_FOUND.into_response()
        }
    }
}
