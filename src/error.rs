//! # Top-Level Error Types
//!
//! Crate-wide error type used by configuration, database bring-up, and the
//! process binaries. Layer-specific errors live next to their layers
//! ([`crate::messaging::MessagingError`], [`crate::web::response_types::ApiError`])
//! and convert into this one where a caller needs a single type.

use thiserror::Error;

/// Errors surfaced by taskhelm's shared infrastructure
#[derive(Error, Debug)]
pub enum TaskhelmError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Messaging error: {0}")]
    Messaging(#[from] crate::messaging::MessagingError),
}

impl TaskhelmError {
    /// Create a configuration error with context
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

/// Result alias for operations returning [`TaskhelmError`]
pub type Result<T> = std::result::Result<T, TaskhelmError>;
