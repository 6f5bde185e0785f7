//! Error types for the blob indexer repository.
//!
//! This module provides a unified error type for all administrative calls.

mod search_service_error;

pub use search_service_error::SearchServiceError;
