//! # Web API Error Types
//!
//! Error types for the task API and their HTTP conversions. Error bodies
//! use the flat `{"message": ...}` shape the dashboard and operator tooling
//! consume, via thiserror and Axum's IntoResponse.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::messaging::MessagingError;

/// Flat message body shared by errors and simple acknowledgments
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Task API errors with HTTP status code mappings
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{message}")]
    NotFound { message: String },

    #[error("Invalid request: {message}")]
    BadRequest { message: String },

    #[error("Database operation failed: {operation}")]
    DatabaseError { operation: String },

    #[error("Broker operation failed: {operation}")]
    BrokerError { operation: String },
}

impl ApiError {
    /// Create a NotFound error with the wire-contract message
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a BadRequest error with a custom message
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Create a DatabaseError with operation context
    pub fn database_error(operation: impl Into<String>) -> Self {
        Self::DatabaseError {
            operation: operation.into(),
        }
    }

    /// Create a BrokerError with operation context
    pub fn broker_error(operation: impl Into<String>) -> Self {
        Self::BrokerError {
            operation: operation.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status_code, message) = match self {
            ApiError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            ApiError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            ApiError::DatabaseError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database operation failed".to_string(),
            ),
            ApiError::BrokerError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Message broker operation failed".to_string(),
            ),
        };

        (status_code, Json(MessageResponse::new(message))).into_response()
    }
}

/// Convert sqlx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(_) => ApiError::database_error("query failed"),
            sqlx::Error::PoolTimedOut => ApiError::database_error("pool timed out"),
            _ => ApiError::database_error(err.to_string()),
        }
    }
}

/// Convert messaging errors to API errors
impl From<MessagingError> for ApiError {
    fn from(err: MessagingError) -> Self {
        ApiError::broker_error(err.to_string())
    }
}

/// Result type alias for task API handlers
pub type ApiResult<T> = Result<T, ApiError>;
