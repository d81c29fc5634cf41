//! Error type returned by every handler.
//!
//! # Design
//! Rejected input (422), an unknown id or path (404), a method the path does
//! not serve (405) and a failed store call (500) all leave the service as
//! the same JSON error body. Store errors
//! keep the name of the operation that failed so the log line and the
//! response message both say what was being attempted.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    Validation {
        message: String,
        errors: Vec<FieldError>,
    },

    #[error("Todo {id} not found")]
    NotFound { id: i64 },

    #[error("no route for {path}")]
    NoRoute { path: String },

    #[error("method {method} is not allowed here")]
    MethodNotAllowed { method: String },

    #[error("failed to {operation}: {source}")]
    Store {
        operation: &'static str,
        #[source]
        source: StoreError,
    },
}

/// One rejected field and the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<FieldError>,
}

impl ApiError {
    /// Adapter for `map_err` that tags a store failure with its operation.
    pub fn store(operation: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| Self::Store { operation, source }
    }

    fn invalid(message: impl Into<String>, field: Option<&str>) -> Self {
        let message = message.into();
        let errors = field
            .map(|field| {
                vec![FieldError {
                    field: field.to_string(),
                    message: message.clone(),
                }]
            })
            .unwrap_or_default();
        Self::Validation { message, errors }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound { .. } | Self::NoRoute { .. } => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::Store { operation, source } => {
                tracing::error!(operation, error = %source, "store operation failed");
            }
            Self::NotFound { id } => tracing::debug!(id, "todo not found"),
            Self::NoRoute { path } => tracing::debug!(%path, "no route"),
            Self::MethodNotAllowed { method } => tracing::debug!(%method, "method not allowed"),
            Self::Validation { message, .. } => tracing::debug!(%message, "request rejected"),
        }
        let errors = match &self {
            Self::Validation { errors, .. } => errors.clone(),
            _ => Vec::new(),
        };
        let body = ErrorBody {
            code: status.as_u16(),
            message: self.to_string(),
            errors,
        };
        (status, Json(body)).into_response()
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| FieldError {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(ToString::to_string)
                        .unwrap_or_else(|| error.code.to_string()),
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        Self::Validation {
            message: "request validation failed".to_string(),
            errors: fields,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::invalid(rejection.body_text(), Some("body"))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::invalid(rejection.body_text(), Some("query"))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::invalid(rejection.body_text(), Some("id"))
    }
}
