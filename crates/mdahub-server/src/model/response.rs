//! HTTP response types for the MDAHub server
//!
//! This module provides common response structures for API responses
//! and the tagged-error to HTTP status dispatch used by every handler.

use actix_web::{HttpResponse, HttpResponseBuilder, http::StatusCode};
use serde::{Deserialize, Serialize};

use mdahub_common::PortalError;

/// Generic result wrapper for API responses
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Result<T> {
    pub code: i32,
    pub message: String,
    pub data: T,
}

impl<T> Result<T> {
    pub fn new(code: i32, message: String, data: T) -> Self {
        Result::<T> { code, message, data }
    }

    pub fn success(data: T) -> Result<T> {
        Result::<T> {
            code: 0,
            message: "success".to_string(),
            data,
        }
    }

    pub fn http_success(data: impl Serialize) -> HttpResponse {
        HttpResponse::Ok().json(Result::success(data))
    }

    pub fn http_response(
        status: u16,
        code: i32,
        message: String,
        data: impl Serialize,
    ) -> HttpResponse {
        HttpResponseBuilder::new(StatusCode::from_u16(status).unwrap_or_default())
            .json(Result::new(code, message, data))
    }
}

/// Error result for API error responses
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorResult {
    pub timestamp: String,
    pub status: i32,
    pub error: String,
    pub message: String,
    pub path: String,
}

impl ErrorResult {
    pub fn new(status: StatusCode, message: &str, path: &str) -> Self {
        ErrorResult {
            timestamp: chrono::Utc::now().to_rfc3339(),
            status: status.as_u16() as i32,
            error: status.canonical_reason().unwrap_or_default().to_string(),
            message: message.to_string(),
            path: path.to_string(),
        }
    }

    pub fn http_response_unauthorized(message: &str, path: &str) -> HttpResponse {
        HttpResponse::Unauthorized().json(ErrorResult::new(
            StatusCode::UNAUTHORIZED,
            message,
            path,
        ))
    }

    pub fn http_response_forbidden(message: &str, path: &str) -> HttpResponse {
        HttpResponse::Forbidden().json(ErrorResult::new(StatusCode::FORBIDDEN, message, path))
    }
}

/// Map a service error onto an HTTP response by downcasting to the
/// tagged error enum. Anything without a domain meaning becomes a 500.
pub fn error_response(err: &anyhow::Error) -> HttpResponse {
    match err.downcast_ref::<PortalError>() {
        Some(portal_err) => Result::<String>::http_response(
            portal_err.http_status(),
            portal_err.error_code().code,
            portal_err.to_string(),
            String::new(),
        ),
        None => {
            tracing::error!("unhandled service error: {:?}", err);
            Result::<String>::http_response(
                500,
                mdahub_common::error::SERVER_ERROR.code,
                format!("caused: {}", err),
                String::new(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_success() {
        let result = Result::success("payload");
        assert_eq!(result.code, 0);
        assert_eq!(result.message, "success");
        assert_eq!(result.data, "payload");
    }

    #[test]
    fn test_error_result_shape() {
        let err = ErrorResult::new(StatusCode::FORBIDDEN, "nope", "/api/admin/users");
        assert_eq!(err.status, 403);
        assert_eq!(err.error, "Forbidden");
        assert_eq!(err.path, "/api/admin/users");
    }
}
