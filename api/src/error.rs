//! Error taxonomy shared by every handler.
//!
//! Each variant maps onto one HTTP status and is rendered through the uniform
//! `ApiResponse` envelope, so handlers can bail out with `?` anywhere.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::validation_error_messages;
use thiserror::Error;
use validator::ValidationErrors;

use crate::response::{ApiResponse, Empty};

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed, missing, or inconsistent input (400).
    #[error("{message}")]
    Validation {
        message: String,
        errors: Option<Vec<String>>,
    },
    /// Missing/invalid/expired token or bad credentials (401).
    #[error("{0}")]
    Auth(String),
    /// Role or account-status denial (403).
    #[error("{0}")]
    Forbidden(String),
    /// Missing record (404).
    #[error("{0}")]
    NotFound(String),
    /// Duplicate unique field (409).
    #[error("{0}")]
    Conflict(String),
    /// Object-storage or mail-service failure (500).
    #[error("{0}")]
    Upstream(String),
    #[error("Database error: {0}")]
    Db(#[from] sea_orm::DbErr),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            errors: None,
        }
    }

    /// Wraps a `validator` failure, carrying one entry per offending field.
    pub fn validation_errors(errors: &ValidationErrors) -> Self {
        ApiError::Validation {
            message: "Errores de validación".to_string(),
            errors: Some(validation_error_messages(errors)),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Upstream(_) | ApiError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
        }

        let body = match self {
            ApiError::Validation {
                message,
                errors: Some(errors),
            } => ApiResponse::<Empty>::error_with(message, errors),
            other => ApiResponse::<Empty>::error(other.to_string()),
        };

        (status, Json(body)).into_response()
    }
}
