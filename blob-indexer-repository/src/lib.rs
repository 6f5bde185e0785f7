//! # Blob Indexer Repository
//!
//! This crate provides the trait and implementations for talking to the
//! search service's administrative API. It includes the error type, the
//! `SearchServiceProvider` interface, a concrete implementation over the
//! Azure Cognitive Search REST API, and an in-memory mock for tests.

pub mod azure;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod mock;
pub mod types;

pub use azure::AzureSearchProvider;
pub use config::AzureSearchConfig;
pub use errors::SearchServiceError;
pub use interfaces::SearchServiceProvider;
pub use mock::{MockCall, MockSearchService};
pub use types::{RunIndexerOutcome, ServiceOperation};
