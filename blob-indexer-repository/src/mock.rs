//! In-memory search service for testing and local development.
//!
//! `MockSearchService` keeps indexes, data sources and indexers in memory and
//! answers like the real service would: creating an index that already exists
//! conflicts, an indexer must reference existing resources, and resetting or
//! running an unknown indexer is a 404. Every call is recorded so tests can
//! assert on the exact sequence the workflow issued.
//!
//! # Example
//!
//! ```ignore
//! use blob_indexer_repository::{MockSearchService, ServiceOperation};
//!
//! let service = MockSearchService::new();
//! service.fail_with_status(ServiceOperation::CreateIndex, 400);
//! assert!(service.create_index(&index).await.is_err());
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use blob_indexer_shared::{DataSource, Index, Indexer};

use crate::errors::SearchServiceError;
use crate::interfaces::SearchServiceProvider;
use crate::types::{RunIndexerOutcome, ServiceOperation};

/// A call received by the mock, with the resource name it targeted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCall {
    pub operation: ServiceOperation,
    pub name: String,
}

impl MockCall {
    pub fn new(operation: ServiceOperation, name: impl Into<String>) -> Self {
        Self {
            operation,
            name: name.into(),
        }
    }
}

#[derive(Debug, Default)]
struct MockState {
    indexes: HashMap<String, Index>,
    data_sources: HashMap<String, DataSource>,
    indexers: HashMap<String, Indexer>,
    /// Run requests accepted per indexer since its last reset.
    pending_runs: HashMap<String, usize>,
    calls: Vec<MockCall>,
    failures: HashMap<ServiceOperation, u16>,
    rate_limited: HashSet<String>,
}

/// Mock search service that holds its resources in memory.
#[derive(Debug, Default)]
pub struct MockSearchService {
    state: Mutex<MockState>,
}

impl MockSearchService {
    /// Create an empty service.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make every later call to `operation` fail with `status`.
    pub fn fail_with_status(&self, operation: ServiceOperation, status: u16) {
        self.state().failures.insert(operation, status);
    }

    /// Answer run requests for `indexer` with 429.
    pub fn rate_limit_runs(&self, indexer: &str) {
        self.state().rate_limited.insert(indexer.to_string());
    }

    /// Pre-populate an index, as if created by an earlier run.
    pub fn seed_index(&self, index: Index) {
        self.state().indexes.insert(index.name.clone(), index);
    }

    /// Pre-populate an indexer, as if created by an earlier run.
    pub fn seed_indexer(&self, indexer: Indexer) {
        let mut state = self.state();
        state.pending_runs.insert(indexer.name.clone(), 1);
        state.indexers.insert(indexer.name.clone(), indexer);
    }

    pub fn index(&self, name: &str) -> Option<Index> {
        self.state().indexes.get(name).cloned()
    }

    pub fn data_source(&self, name: &str) -> Option<DataSource> {
        self.state().data_sources.get(name).cloned()
    }

    pub fn indexer(&self, name: &str) -> Option<Indexer> {
        self.state().indexers.get(name).cloned()
    }

    pub fn index_count(&self) -> usize {
        self.state().indexes.len()
    }

    pub fn data_source_count(&self) -> usize {
        self.state().data_sources.len()
    }

    pub fn indexer_count(&self) -> usize {
        self.state().indexers.len()
    }

    /// Run requests accepted for `indexer` since it was created or last reset.
    pub fn pending_runs(&self, indexer: &str) -> usize {
        self.state().pending_runs.get(indexer).copied().unwrap_or(0)
    }

    /// Every call received, in order.
    pub fn calls(&self) -> Vec<MockCall> {
        self.state().calls.clone()
    }

    /// The operations received, in order.
    pub fn operations(&self) -> Vec<ServiceOperation> {
        self.state().calls.iter().map(|c| c.operation).collect()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    /// Record the call and return the injected failure for it, if any.
    fn record(
        state: &mut MockState,
        operation: ServiceOperation,
        name: &str,
    ) -> Result<(), SearchServiceError> {
        state.calls.push(MockCall::new(operation, name));
        match state.failures.get(&operation) {
            Some(&status) => Err(SearchServiceError::status(
                operation,
                status,
                format!("injected failure for {}", name),
            )),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl SearchServiceProvider for MockSearchService {
    async fn index_exists(&self, name: &str) -> Result<bool, SearchServiceError> {
        let mut state = self.state();
        Self::record(&mut state, ServiceOperation::IndexExists, name)?;
        Ok(state.indexes.contains_key(name))
    }

    async fn delete_index(&self, name: &str) -> Result<(), SearchServiceError> {
        let mut state = self.state();
        Self::record(&mut state, ServiceOperation::DeleteIndex, name)?;
        state.indexes.remove(name);
        Ok(())
    }

    async fn create_index(&self, index: &Index) -> Result<(), SearchServiceError> {
        let operation = ServiceOperation::CreateIndex;
        let mut state = self.state();
        Self::record(&mut state, operation, &index.name)?;

        index
            .validate()
            .map_err(|e| SearchServiceError::status(operation, 400, e.to_string()))?;
        if state.indexes.contains_key(&index.name) {
            return Err(SearchServiceError::status(
                operation,
                409,
                format!("Index '{}' already exists", index.name),
            ));
        }
        state.indexes.insert(index.name.clone(), index.clone());
        Ok(())
    }

    async fn create_or_update_data_source(
        &self,
        data_source: &DataSource,
    ) -> Result<(), SearchServiceError> {
        let mut state = self.state();
        Self::record(
            &mut state,
            ServiceOperation::CreateOrUpdateDataSource,
            &data_source.name,
        )?;
        state
            .data_sources
            .insert(data_source.name.clone(), data_source.clone());
        Ok(())
    }

    async fn indexer_exists(&self, name: &str) -> Result<bool, SearchServiceError> {
        let mut state = self.state();
        Self::record(&mut state, ServiceOperation::IndexerExists, name)?;
        Ok(state.indexers.contains_key(name))
    }

    async fn reset_indexer(&self, name: &str) -> Result<(), SearchServiceError> {
        let operation = ServiceOperation::ResetIndexer;
        let mut state = self.state();
        Self::record(&mut state, operation, name)?;

        if !state.indexers.contains_key(name) {
            return Err(SearchServiceError::status(
                operation,
                404,
                format!("Indexer '{}' was not found", name),
            ));
        }
        state.pending_runs.insert(name.to_string(), 0);
        Ok(())
    }

    async fn create_or_update_indexer(
        &self,
        indexer: &Indexer,
    ) -> Result<(), SearchServiceError> {
        let operation = ServiceOperation::CreateOrUpdateIndexer;
        let mut state = self.state();
        Self::record(&mut state, operation, &indexer.name)?;

        if !state.data_sources.contains_key(&indexer.data_source_name) {
            return Err(SearchServiceError::status(
                operation,
                400,
                format!("Data source '{}' was not found", indexer.data_source_name),
            ));
        }
        if !state.indexes.contains_key(&indexer.target_index_name) {
            return Err(SearchServiceError::status(
                operation,
                400,
                format!("Index '{}' was not found", indexer.target_index_name),
            ));
        }
        state
            .pending_runs
            .entry(indexer.name.clone())
            .or_insert(0);
        state.indexers.insert(indexer.name.clone(), indexer.clone());
        Ok(())
    }

    async fn run_indexer(&self, name: &str) -> Result<RunIndexerOutcome, SearchServiceError> {
        let operation = ServiceOperation::RunIndexer;
        let mut state = self.state();
        Self::record(&mut state, operation, name)?;

        if !state.indexers.contains_key(name) {
            return Err(SearchServiceError::status(
                operation,
                404,
                format!("Indexer '{}' was not found", name),
            ));
        }
        if state.rate_limited.contains(name) {
            return Ok(RunIndexerOutcome::RateLimited {
                message: format!("Too many requests for indexer '{}'", name),
            });
        }
        *state.pending_runs.entry(name.to_string()).or_insert(0) += 1;
        Ok(RunIndexerOutcome::Started)
    }
}
