//! HTTP response types for the Gavel server
//!
//! This module provides the common result wrapper returned by every
//! endpoint, plus the mapping from service-layer errors to HTTP status
//! codes.

use actix_web::{HttpResponse, HttpResponseBuilder, http::StatusCode};
use gavel_common::error::{self, GavelError};
use serde::{Deserialize, Serialize};

/// Generic result wrapper for API responses
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Result<T> {
    pub code: i32,
    pub message: String,
    pub data: T,
}

impl<T> Result<T> {
    pub fn new(code: i32, message: String, data: T) -> Self {
        Result::<T> {
            code,
            message,
            data,
        }
    }

    pub fn success(data: T) -> Result<T> {
        Result::<T> {
            code: error::SUCCESS.code,
            message: error::SUCCESS.message.to_string(),
            data,
        }
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

pub fn http_success(data: impl Serialize) -> HttpResponse {
    HttpResponse::Ok().json(Result::success(data))
}

/// Map a service-layer failure to an HTTP response
///
/// Known `GavelError` variants carry their own status and error code;
/// anything else is a 500.
pub fn handle_error(err: anyhow::Error) -> HttpResponse {
    let (status, code) = match err.downcast_ref::<GavelError>() {
        Some(GavelError::AccountNotFound(_)) => (404, error::ACCOUNT_NOT_FOUND.code),
        Some(GavelError::ApplicationNotFound(_)) => (404, error::APPLICATION_NOT_FOUND.code),
        Some(GavelError::Forbidden(_)) => (403, error::ACCESS_DENIED.code),
        Some(GavelError::Validation(_)) | Some(GavelError::IllegalArgument(_)) => {
            (400, error::PARAMETER_VALIDATE_ERROR.code)
        }
        Some(GavelError::DuplicateAccount(_)) => (400, error::ACCOUNT_ALREADY_EXISTS.code),
        Some(GavelError::DirectoryError(_)) => (502, error::DIRECTORY_ERROR.code),
        Some(GavelError::DatabaseError(_)) => (500, error::DATA_ACCESS_ERROR.code),
        _ => (500, error::SERVER_ERROR.code),
    };

    Result::<String>::http_response(status, code, err.to_string(), String::new())
}
