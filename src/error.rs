use std::collections::BTreeMap;

use axum::{Json, http::StatusCode, response::{IntoResponse, Response}};
use serde::Serialize;
use thiserror::Error;

/// Violation code reported for a missing or empty field.
pub const REQUIRED: &str = "required";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl AppError {
    pub fn database() -> Self {
        AppError::Internal("Database Error".to_string())
    }

    pub fn invalid_id() -> Self {
        AppError::BadRequest("ID is invalid".to_string())
    }

    pub fn no_match(id: &str) -> Self {
        AppError::NotFound(format!("No documents matching id {}", id))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(e) => e.status_code(),
        }
    }

    /// Drops the status code, keeping only what goes into the response body.
    pub fn as_message(&self) -> ErrorResponse {
        match self {
            AppError::NotFound(msg) | AppError::BadRequest(msg) | AppError::Internal(msg) => {
                ErrorResponse::Message { message: msg.clone() }
            }
            AppError::Validation(e) => e.as_message(),
        }
    }
}

/// Field path (as named on the wire, e.g. `tasks[0].name`) mapped to a violation code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("invalid fields: {invalid_fields:?}")]
pub struct ValidationError {
    invalid_fields: BTreeMap<String, String>,
}

impl ValidationError {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, violation: impl Into<String>) {
        self.invalid_fields.insert(field.into(), violation.into());
    }

    pub fn is_empty(&self) -> bool {
        self.invalid_fields.is_empty()
    }

    pub fn invalid_fields(&self) -> &BTreeMap<String, String> {
        &self.invalid_fields
    }

    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    pub fn as_message(&self) -> ErrorResponse {
        ErrorResponse::InvalidFields {
            invalid_fields: self.invalid_fields.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ErrorResponse {
    Message { message: String },
    InvalidFields { invalid_fields: BTreeMap<String, String> },
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.as_message())).into_response()
    }
}
