//! API error envelope
//!
//! Every failure leaves the service as
//! `{success: false, error_code, message, details}`. Internal errors never
//! carry their cause unless the debug middleware is installed.

use crate::db::StoreError;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Request,
    },
    http::{Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use biz_core::CoreError;
use serde::Serialize;
use serde_json::{json, Value};
use std::any::Any;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    Unauthorized,
    Forbidden,
    NotFound,
    MethodNotAllowed,
    InvalidInput,
    Conflict,
    InternalError,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ErrorCode::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    MethodNotAllowed(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    /// The payload is logged and only exposed in debug mode
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn not_found(resource: &str) -> Self {
        ApiError::NotFound(format!("{resource} not found"))
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ApiError::Unauthorized(_) => ErrorCode::Unauthorized,
            ApiError::Forbidden(_) => ErrorCode::Forbidden,
            ApiError::NotFound(_) => ErrorCode::NotFound,
            ApiError::MethodNotAllowed(_) => ErrorCode::MethodNotAllowed,
            ApiError::Validation(_) => ErrorCode::InvalidInput,
            ApiError::Conflict(_) => ErrorCode::Conflict,
            ApiError::Internal(_) => ErrorCode::InternalError,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    success: bool,
    error_code: ErrorCode,
    message: &'a str,
    details: Value,
}

fn envelope(code: ErrorCode, message: &str, details: Value) -> Response {
    let body = ErrorBody {
        success: false,
        error_code: code,
        message,
        details,
    };
    (code.status(), Json(body)).into_response()
}

/// Raw cause of an internal error, carried on the response for
/// [`attach_debug_details`]
#[derive(Clone, Debug)]
struct InternalCause(String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Internal(cause) => {
                tracing::error!(error = %cause, "internal error");
                let mut response =
                    envelope(ErrorCode::InternalError, "Internal server error", json!({}));
                response.extensions_mut().insert(InternalCause(cause));
                response
            }
            other => {
                let message = other.to_string();
                envelope(other.code(), &message, json!({}))
            }
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::IllegalTransition { .. }
            | CoreError::Validation(_)
            | CoreError::UnknownVariant { .. } => ApiError::Validation(err.to_string()),
            CoreError::Provider { .. } | CoreError::Render(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(what) => ApiError::Conflict(format!("{what} already exists")),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

/// Debug-mode middleware: re-renders internal errors with `details.error`.
pub async fn attach_debug_details(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    match response.extensions_mut().remove::<InternalCause>() {
        Some(InternalCause(cause)) => envelope(
            ErrorCode::InternalError,
            "Internal server error",
            json!({ "error": cause }),
        ),
        None => response,
    }
}

/// Panic handler for `CatchPanicLayer`
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let cause = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    ApiError::Internal(format!("panic: {cause}")).into_response()
}

/// Fallback for unmatched routes
pub async fn route_not_found() -> ApiError {
    ApiError::not_found("route")
}

/// Fallback for a known path hit with an unsupported method
pub async fn method_not_allowed(method: Method) -> ApiError {
    ApiError::MethodNotAllowed(format!("Method {method} is not allowed on this route"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use biz_core::{IdeaStatus, Trigger};

    #[test]
    fn test_core_errors_map_to_validation() {
        let err: ApiError = CoreError::IllegalTransition {
            from: IdeaStatus::Completed,
            trigger: Trigger::StartCollection,
        }
        .into();
        assert_eq!(err.code(), ErrorCode::InvalidInput);
        assert_eq!(err.code().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_duplicate_maps_to_conflict() {
        let err: ApiError = StoreError::Duplicate("email").into();
        assert_eq!(err.code(), ErrorCode::Conflict);
        assert_eq!(err.to_string(), "email already exists");
    }

    #[test]
    fn test_internal_hides_cause() {
        let response = ApiError::Internal("db exploded".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.extensions().get::<InternalCause>().is_some());
    }

    #[test]
    fn test_error_code_spelling() {
        assert_eq!(
            serde_json::to_string(&ErrorCode::InvalidInput).unwrap(),
            "\"INVALID_INPUT\""
        );
    }

    #[tokio::test]
    async fn test_method_not_allowed_envelope() {
        let err = method_not_allowed(Method::PUT).await;
        assert_eq!(err.code(), ErrorCode::MethodNotAllowed);
        assert!(err.to_string().contains("PUT"));

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            serde_json::to_string(&ErrorCode::MethodNotAllowed).unwrap(),
            "\"METHOD_NOT_ALLOWED\""
        );
    }
}
