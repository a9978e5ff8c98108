//! Response DTOs for the cache server API
//!
//! Every endpoint answers with one of three JSON envelopes: a value, a
//! human-readable message, or an error.

use serde::Serialize;
use serde_json::Value;

/// `{"value": ...}` envelope for data-bearing responses.
#[derive(Debug, Clone, Serialize)]
pub struct ValueResponse {
    /// The requested or stored value
    pub value: Value,
}

impl ValueResponse {
    /// Creates a new ValueResponse
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// `{"message": ...}` envelope for acknowledgement responses.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    /// Success message
    pub message: String,
}

impl MessageResponse {
    /// Creates a new MessageResponse
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// `{"error": ...}` envelope for all error conditions.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
