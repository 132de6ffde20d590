//! # Messaging Error Types
//!
//! Structured error handling for broker operations using thiserror
//! instead of `Box<dyn Error>` patterns.

use thiserror::Error;

/// Errors raised by broker connections, topology setup, and message flow
#[derive(Error, Debug)]
pub enum MessagingError {
    #[error("Broker connection error: {message}")]
    Connection { message: String },

    #[error("Channel error: {message}")]
    Channel { message: String },

    #[error("Topology operation failed: {name}: {operation}: {message}")]
    Topology {
        name: String,
        operation: String,
        message: String,
    },

    #[error("Publish failed: {destination}: {message}")]
    Publish {
        destination: String,
        message: String,
    },

    #[error("Consume failed: {queue_name}: {message}")]
    Consume {
        queue_name: String,
        message: String,
    },

    #[error("Message serialization error: {message}")]
    MessageSerialization { message: String },

    #[error("Message deserialization error: {message}")]
    MessageDeserialization { message: String },

    #[error("Database error during {operation}: {message}")]
    Database { operation: String, message: String },

    #[error("Internal messaging error: {message}")]
    Internal { message: String },
}

impl MessagingError {
    /// Create a broker connection error
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a channel error
    pub fn channel(message: impl Into<String>) -> Self {
        Self::Channel {
            message: message.into(),
        }
    }

    /// Create a topology error for a queue or exchange operation
    pub fn topology(
        name: impl Into<String>,
        operation: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Topology {
            name: name.into(),
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create a publish error
    pub fn publish(destination: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Publish {
            destination: destination.into(),
            message: message.into(),
        }
    }

    /// Create a consume error
    pub fn consume(queue_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Consume {
            queue_name: queue_name.into(),
            message: message.into(),
        }
    }

    /// Create a message serialization error
    pub fn message_serialization(message: impl Into<String>) -> Self {
        Self::MessageSerialization {
            message: message.into(),
        }
    }

    /// Create a message deserialization error
    pub fn message_deserialization(message: impl Into<String>) -> Self {
        Self::MessageDeserialization {
            message: message.into(),
        }
    }

    /// Create a database error for reconciliation writes
    pub fn database(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Database {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// Conversion from serde_json::Error to MessagingError
impl From<serde_json::Error> for MessagingError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() || err.is_data() || err.is_eof() {
            MessagingError::message_deserialization(err.to_string())
        } else {
            MessagingError::message_serialization(err.to_string())
        }
    }
}

/// Conversion from sqlx::Error to MessagingError
impl From<sqlx::Error> for MessagingError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => MessagingError::database("query", "No rows found"),
            sqlx::Error::Database(db_err) => {
                MessagingError::database("database", db_err.to_string())
            }
            _ => MessagingError::database("connection", err.to_string()),
        }
    }
}

/// Result type alias for messaging operations
pub type MessagingResult<T> = Result<T, MessagingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messaging_error_creation() {
        let conn_err = MessagingError::connection("Connection refused");
        assert!(matches!(conn_err, MessagingError::Connection { .. }));

        let topo_err = MessagingError::topology("task_queue", "declare", "PRECONDITION_FAILED");
        assert!(matches!(topo_err, MessagingError::Topology { .. }));

        let publish_err = MessagingError::publish("report_queue", "channel closed");
        assert!(matches!(publish_err, MessagingError::Publish { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = MessagingError::topology("taskhelm_tasks", "declare", "access refused");
        let display = format!("{err}");
        assert!(display.contains("Topology operation failed"));
        assert!(display.contains("taskhelm_tasks"));
        assert!(display.contains("declare"));
        assert!(display.contains("access refused"));
    }

    #[test]
    fn test_serde_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let messaging_err: MessagingError = json_err.into();
        assert!(matches!(
            messaging_err,
            MessagingError::MessageDeserialization { .. }
        ));
    }

    #[test]
    fn test_sqlx_error_conversion() {
        let messaging_err: MessagingError = sqlx::Error::RowNotFound.into();
        assert!(matches!(messaging_err, MessagingError::Database { .. }));
    }
}
