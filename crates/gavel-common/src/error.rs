//! Error types and error codes for Gavel
//!
//! This module defines:
//! - `GavelError`: Application-specific error enum
//! - `ErrorCode`: Structured error codes for API responses

use serde::{Deserialize, Serialize};

/// Application-specific error types
#[derive(thiserror::Error, Debug)]
pub enum GavelError {
    #[error("caused: {0}")]
    IllegalArgument(String),

    #[error("account '{0}' not found")]
    AccountNotFound(String),

    #[error("application '{0}' not found")]
    ApplicationNotFound(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("account with email '{0}' already exists")]
    DuplicateAccount(String),

    #[error("identity directory error: {0}")]
    DirectoryError(String),

    #[error("notification error: {0}")]
    NotificationError(String),

    #[error("database error: {0}")]
    DatabaseError(String),

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("internal error: {0}")]
    InternalError(String),
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

pub const DATA_ACCESS_ERROR: ErrorCode<'static> = ErrorCode {
    code: 10002,
    message: "data access error",
};

pub const PARAMETER_VALIDATE_ERROR: ErrorCode<'static> = ErrorCode {
    code: 20002,
    message: "parameter validate error",
};

pub const ACCOUNT_NOT_FOUND: ErrorCode<'static> = ErrorCode {
    code: 30001,
    message: "account not found",
};

pub const ACCOUNT_ALREADY_EXISTS: ErrorCode<'static> = ErrorCode {
    code: 30002,
    message: "account already exists",
};

pub const APPLICATION_NOT_FOUND: ErrorCode<'static> = ErrorCode {
    code: 30003,
    message: "media application not found",
};

pub const DIRECTORY_ERROR: ErrorCode<'static> = ErrorCode {
    code: 30004,
    message: "identity directory error",
};

pub const SERVER_ERROR: ErrorCode<'static> = ErrorCode {
    code: 30000,
    message: "server error",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gavel_error_display() {
        let err = GavelError::IllegalArgument("invalid param".to_string());
        assert_eq!(format!("{}", err), "caused: invalid param");

        let err = GavelError::AccountNotFound("abc-123".to_string());
        assert_eq!(format!("{}", err), "account 'abc-123' not found");

        let err = GavelError::DuplicateAccount("a@b.com".to_string());
        assert_eq!(
            format!("{}", err),
            "account with email 'a@b.com' already exists"
        );
    }

    #[test]
    fn test_error_code_constants() {
        assert_eq!(SUCCESS.code, 0);
        assert_eq!(SUCCESS.message, "success");
        assert_eq!(ACCESS_DENIED.code, 10001);
        assert_eq!(ACCOUNT_NOT_FOUND.code, 30001);
    }
}
