use std::error::Error as StdError;

use axum::{http::StatusCode, response::Response};
use metrics::counter;
use thiserror::Error;

use crate::{
    application::repos::RepoError, config::LoadError, domain::error::ValidationError,
    infra::error::InfraError,
};

/// Diagnostic chain attached to error responses so the logging middleware can report it.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub source: &'static str,
    pub status: StatusCode,
    pub messages: Vec<String>,
}

impl ErrorReport {
    pub fn from_error(source: &'static str, status: StatusCode, error: &dyn StdError) -> Self {
        let mut messages = Vec::new();
        messages.push(error.to_string());
        let mut current = error.source();
        while let Some(inner) = current {
            messages.push(inner.to_string());
            current = inner.source();
        }
        Self {
            source,
            status,
            messages,
        }
    }

    pub fn from_message(
        source: &'static str,
        status: StatusCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source,
            status,
            messages: vec![message.into()],
        }
    }

    pub fn attach(self, response: &mut Response) {
        response.extensions_mut().insert(self);
    }
}

/// Outcome of a record or report operation that did not succeed.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("malformed `{field}`: {reason}")]
    MalformedInput { field: &'static str, reason: String },
    #[error("missing required field `{0}`")]
    MissingRequiredField(&'static str),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("email `{email}` is already registered")]
    EmailAlreadyExists { email: String },
    #[error("{entity} not found")]
    NotFound { entity: &'static str },
    #[error("no fields to update")]
    NoFieldsToUpdate,
    #[error("report rendering failed: {0}")]
    Render(String),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl ServiceError {
    pub fn malformed(field: &'static str, reason: impl std::fmt::Display) -> Self {
        Self::MalformedInput {
            field,
            reason: reason.to_string(),
        }
    }

    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound { entity }
    }

    /// Label for caller mistakes; `None` for lookups and upstream failures.
    pub fn rejection_reason(&self) -> Option<&'static str> {
        match self {
            Self::MalformedInput { .. } => Some("malformed_input"),
            Self::MissingRequiredField(_) => Some("missing_required_field"),
            Self::Validation(err) => Some(err.reason()),
            Self::EmailAlreadyExists { .. } => Some("email_already_exists"),
            Self::NoFieldsToUpdate => Some("no_fields_to_update"),
            Self::NotFound { .. } | Self::Render(_) | Self::Repo(_) => None,
        }
    }
}

/// Count a rejected request under `workrest_validation_failures_total`.
pub fn record_validation_failure(err: &ServiceError) {
    if let Some(reason) = err.rejection_reason() {
        counter!("workrest_validation_failures_total", "reason" => reason).increment(1);
    }
}

/// Process-level failure raised while bootstrapping or serving.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to load configuration: {0}")]
    Config(#[from] LoadError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }
}
