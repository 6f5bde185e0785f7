//! Search service error types.
//!
//! This module defines the unified error type for all administrative calls,
//! covering transport failures as well as error responses from the service.

use thiserror::Error;

use crate::types::ServiceOperation;

/// Unified errors from search service operations.
///
/// Used by the `SearchServiceProvider` trait and its implementations. A
/// rate-limited indexer run is not represented here; it is reported through
/// `RunIndexerOutcome::RateLimited`.
#[derive(Debug, Clone, Error)]
pub enum SearchServiceError {
    /// Invalid client configuration or request input.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The request could not be sent or no response was received.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Failed to read or parse a response.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The service answered with an unexpected status code.
    #[error("{operation} failed with status {status}: {body}")]
    StatusError {
        operation: ServiceOperation,
        status: u16,
        body: String,
    },
}

impl SearchServiceError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create an error for an unexpected response status.
    pub fn status(operation: ServiceOperation, status: u16, body: impl Into<String>) -> Self {
        Self::StatusError {
            operation,
            status,
            body: body.into(),
        }
    }

    /// The HTTP status code, if the service responded at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::StatusError { status, .. } => Some(*status),
            _ => None,
        }
    }
}
