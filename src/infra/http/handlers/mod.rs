//! HTTP handlers organized by resource.
//!
//! Error conversion shared by every handler lives here.

mod employees;
mod health;
mod reports;
mod sales;

pub use employees::*;
pub use health::*;
pub use reports::*;
pub use sales::*;

use axum::http::StatusCode;

use crate::application::error::{ServiceError, record_validation_failure};
use crate::application::repos::RepoError;

use super::error::{ApiError, codes};

pub(crate) fn repo_to_api(err: RepoError) -> ApiError {
    match err {
        RepoError::Duplicate { constraint } => ApiError::new(
            StatusCode::CONFLICT,
            codes::DUPLICATE,
            "Duplicate record",
            Some(constraint),
        ),
        RepoError::NotFound => ApiError::not_found("resource not found"),
        RepoError::InvalidInput { message } => ApiError::new(
            StatusCode::BAD_REQUEST,
            codes::INVALID_INPUT,
            "Invalid input",
            Some(message),
        ),
        RepoError::Integrity { message } => ApiError::new(
            StatusCode::CONFLICT,
            codes::INTEGRITY,
            "Record is still referenced",
            Some(message),
        ),
        RepoError::Timeout => ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            codes::DB_TIMEOUT,
            "Database timeout",
            None,
        ),
        RepoError::Persistence(msg) => ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            codes::REPO,
            "Persistence error",
            Some(msg),
        ),
    }
}

pub(crate) fn service_to_api(err: ServiceError) -> ApiError {
    record_validation_failure(&err);

    match err {
        ServiceError::MalformedInput { .. } => ApiError::malformed(err.to_string()),
        ServiceError::MissingRequiredField(field) => ApiError::new(
            StatusCode::BAD_REQUEST,
            codes::MISSING_FIELD,
            "Missing required field",
            Some(field.to_string()),
        ),
        ServiceError::Validation(inner) => ApiError::new(
            StatusCode::BAD_REQUEST,
            inner.reason(),
            "Validation failed",
            Some(inner.to_string()),
        ),
        ServiceError::EmailAlreadyExists { email } => ApiError::new(
            StatusCode::CONFLICT,
            codes::EMAIL_EXISTS,
            "Email already registered",
            Some(email),
        ),
        ServiceError::NotFound { entity } => match entity {
            "employee" => ApiError::not_found("employee not found"),
            "sale" => ApiError::not_found("sale not found"),
            _ => ApiError::not_found("resource not found"),
        },
        ServiceError::NoFieldsToUpdate => ApiError::new(
            StatusCode::BAD_REQUEST,
            codes::NO_FIELDS,
            "No fields to update",
            Some("supply at least one field that differs from the stored record".to_string()),
        ),
        ServiceError::Render(message) => ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            codes::RENDER,
            "Report rendering failed",
            Some(message),
        ),
        ServiceError::Repo(repo) => repo_to_api(repo),
    }
}

/// Record ids arrive as path text; anything but an integer is malformed.
pub(crate) fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|err| service_to_api(ServiceError::malformed("id", err)))
}
