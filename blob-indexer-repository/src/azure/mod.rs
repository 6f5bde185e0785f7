//! Azure Cognitive Search implementation of the search service provider.
//!
//! This module provides a concrete implementation of `SearchServiceProvider`
//! over the service's administrative REST API.

mod provider;

pub use provider::{AzureSearchProvider, API_KEY_HEADER};
