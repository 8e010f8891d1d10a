//! Error types and error codes for MDAHub
//!
//! This module defines:
//! - `PortalError`: tagged application error enum
//! - `ErrorCode`: structured error codes for API responses
//!
//! Services return `anyhow::Result` and attach a `PortalError` where the
//! failure has a domain meaning; handlers downcast to pick the HTTP status.

use serde::{Deserialize, Serialize};

/// Application-specific error types
#[derive(thiserror::Error, Debug)]
pub enum PortalError {
    #[error("caused: {0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0} already exists")]
    Conflict(String),

    #[error("{0} is still in use")]
    InUse(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("authentication error: {0}")]
    Auth(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl PortalError {
    /// HTTP status the error maps to at the route boundary.
    pub fn http_status(&self) -> u16 {
        match self {
            PortalError::Validation(_) => 400,
            PortalError::NotFound(_) => 404,
            PortalError::Conflict(_) | PortalError::InUse(_) => 409,
            PortalError::Forbidden(_) => 403,
            PortalError::Auth(_) => 401,
            PortalError::Database(_) | PortalError::Internal(_) => 500,
        }
    }

    /// Structured error code paired with the status.
    pub fn error_code(&self) -> ErrorCode<'static> {
        match self {
            PortalError::Validation(_) => PARAMETER_VALIDATE_ERROR,
            PortalError::NotFound(_) => RESOURCE_NOT_FOUND,
            PortalError::Conflict(_) | PortalError::InUse(_) => RESOURCE_CONFLICT,
            PortalError::Forbidden(_) => ACCESS_DENIED,
            PortalError::Auth(_) => UNAUTHORIZED,
            PortalError::Database(_) | PortalError::Internal(_) => SERVER_ERROR,
        }
    }
}

/// Error code structure for API responses
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ErrorCode<'a> {
    pub code: i32,
    pub message: &'a str,
}

pub const SUCCESS: ErrorCode<'static> = ErrorCode {
    code: 0,
    message: "success",
};

pub const PARAMETER_MISSING: ErrorCode<'static> = ErrorCode {
    code: 10000,
    message: "parameter missing",
};

pub const ACCESS_DENIED: ErrorCode<'static> = ErrorCode {
    code: 10001,
    message: "access denied",
};

pub const UNAUTHORIZED: ErrorCode<'static> = ErrorCode {
    code: 10002,
    message: "unauthorized",
};

pub const PARAMETER_VALIDATE_ERROR: ErrorCode<'static> = ErrorCode {
    code: 20002,
    message: "parameter validate error",
};

pub const RESOURCE_NOT_FOUND: ErrorCode<'static> = ErrorCode {
    code: 20004,
    message: "resource not found",
};

pub const RESOURCE_CONFLICT: ErrorCode<'static> = ErrorCode {
    code: 20005,
    message: "resource conflict",
};

pub const SERVER_ERROR: ErrorCode<'static> = ErrorCode {
    code: 30000,
    message: "server error",
};

pub const EXPORT_NO_DATA: ErrorCode<'static> = ErrorCode {
    code: 100013,
    message: "no records found to export",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portal_error_display() {
        let err = PortalError::Validation("invalid param".to_string());
        assert_eq!(format!("{}", err), "caused: invalid param");

        let err = PortalError::NotFound("user 'jdoe'".to_string());
        assert_eq!(format!("{}", err), "user 'jdoe' not found");

        let err = PortalError::Conflict("mda 'Finance'".to_string());
        assert_eq!(format!("{}", err), "mda 'Finance' already exists");
    }

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(PortalError::Validation(String::new()).http_status(), 400);
        assert_eq!(PortalError::Auth(String::new()).http_status(), 401);
        assert_eq!(PortalError::Forbidden(String::new()).http_status(), 403);
        assert_eq!(PortalError::NotFound(String::new()).http_status(), 404);
        assert_eq!(PortalError::Conflict(String::new()).http_status(), 409);
        assert_eq!(PortalError::Database(String::new()).http_status(), 500);
    }

    #[test]
    fn test_error_code_constants() {
        assert_eq!(SUCCESS.code, 0);
        assert_eq!(SUCCESS.message, "success");
        assert_eq!(PARAMETER_MISSING.code, 10000);
        assert_eq!(ACCESS_DENIED.code, 10001);
    }

    #[test]
    fn test_portal_error_downcast_through_anyhow() {
        let err: anyhow::Error = PortalError::Conflict("admin 'x'".to_string()).into();
        assert!(matches!(
            err.downcast_ref::<PortalError>(),
            Some(PortalError::Conflict(_))
        ));
    }
}
