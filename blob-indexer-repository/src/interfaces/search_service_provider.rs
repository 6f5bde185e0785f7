//! Search service provider trait definition.
//!
//! This module defines the abstract interface for the administrative calls
//! the provisioning workflow needs.

use async_trait::async_trait;
use blob_indexer_shared::{DataSource, Index, Indexer};

use crate::errors::SearchServiceError;
use crate::types::RunIndexerOutcome;

/// Abstracts the search service's administrative API.
///
/// Implementations are injected into the provisioning workflow so it can run
/// against the live service or an in-memory mock. Every method maps to a
/// single remote call.
#[async_trait]
pub trait SearchServiceProvider: Send + Sync {
    /// Check whether an index with the given name exists.
    async fn index_exists(&self, name: &str) -> Result<bool, SearchServiceError>;

    /// Delete an index and all of its documents.
    ///
    /// Deleting an index that does not exist is not an error.
    async fn delete_index(&self, name: &str) -> Result<(), SearchServiceError>;

    /// Create a new index. Fails if an index with the same name exists.
    async fn create_index(&self, index: &Index) -> Result<(), SearchServiceError>;

    /// Create a data source, or replace the definition of an existing one.
    async fn create_or_update_data_source(
        &self,
        data_source: &DataSource,
    ) -> Result<(), SearchServiceError>;

    /// Check whether an indexer with the given name exists.
    async fn indexer_exists(&self, name: &str) -> Result<bool, SearchServiceError>;

    /// Reset an indexer's change-tracking state so the next run reprocesses
    /// every document.
    async fn reset_indexer(&self, name: &str) -> Result<(), SearchServiceError>;

    /// Create an indexer, or replace the definition of an existing one.
    async fn create_or_update_indexer(&self, indexer: &Indexer)
        -> Result<(), SearchServiceError>;

    /// Ask the service to run an indexer now.
    ///
    /// # Returns
    ///
    /// * `Ok(RunIndexerOutcome::Started)` - The run was accepted
    /// * `Ok(RunIndexerOutcome::RateLimited { .. })` - The service answered 429
    /// * `Err(SearchServiceError)` - Any other failure
    async fn run_indexer(&self, name: &str) -> Result<RunIndexerOutcome, SearchServiceError>;
}
