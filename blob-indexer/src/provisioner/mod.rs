//! Provisioning workflow.
//!
//! Brings the search service to a known state: one index, one blob-storage
//! data source and one scheduled indexer under fixed names, followed by a
//! request to run the indexer now. Every step is idempotent, so the workflow
//! can be re-run at any time.

use std::sync::Arc;

use blob_indexer_repository::{RunIndexerOutcome, SearchServiceProvider};
use blob_indexer_shared::{
    Contacts, DataSource, Index, Indexer, IndexingSchedule, SoftDeleteColumnDeletionDetectionPolicy,
};
use tracing::{debug, info, instrument, warn};

use crate::config::Settings;
use crate::errors::ProvisioningError;

pub const INDEX_NAME: &str = "index";
pub const DATA_SOURCE_NAME: &str = "datasource";
pub const INDEXER_NAME: &str = "indexer";
pub const CONTAINER_NAME: &str = "contacts";
pub const SOFT_DELETE_COLUMN: &str = "isDeleted";
pub const SOFT_DELETE_MARKER: &str = "true";

/// The resource definitions the workflow applies.
#[derive(Debug, Clone, PartialEq)]
pub struct ProvisioningPlan {
    pub index: Index,
    pub data_source: DataSource,
    pub indexer: Indexer,
}

impl ProvisioningPlan {
    /// The fixed plan: a `Contacts` index fed daily from the `contacts` container.
    pub fn for_contacts(storage_connection_string: impl Into<String>) -> Self {
        let index = Index::for_document::<Contacts>(INDEX_NAME);
        let data_source = DataSource::azure_blob_storage(
            DATA_SOURCE_NAME,
            storage_connection_string,
            CONTAINER_NAME,
            Some(
                SoftDeleteColumnDeletionDetectionPolicy::new(SOFT_DELETE_COLUMN, SOFT_DELETE_MARKER)
                    .into(),
            ),
        );
        let indexer = Indexer::new(
            INDEXER_NAME,
            &data_source.name,
            &index.name,
            Some(IndexingSchedule::daily()),
        );

        Self {
            index,
            data_source,
            indexer,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::for_contacts(settings.storage_connection_string.clone())
    }
}

/// What a completed run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningReport {
    /// An index with the same name existed and was deleted first.
    pub index_replaced: bool,
    /// The indexer existed and its state was reset before redefinition.
    pub indexer_reset: bool,
    /// Outcome of the immediate run request.
    pub run: RunIndexerOutcome,
}

/// Applies a [`ProvisioningPlan`] through a search service provider.
///
/// Steps run strictly in sequence. A failure stops the workflow at that step
/// and leaves resources created by earlier steps in place.
pub struct Provisioner {
    provider: Arc<dyn SearchServiceProvider>,
    plan: ProvisioningPlan,
}

impl Provisioner {
    pub fn new(provider: Arc<dyn SearchServiceProvider>, plan: ProvisioningPlan) -> Self {
        Self { provider, plan }
    }

    pub fn plan(&self) -> &ProvisioningPlan {
        &self.plan
    }

    /// Run every step of the workflow.
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<ProvisioningReport, ProvisioningError> {
        self.plan.index.validate()?;

        info!(index = %self.plan.index.name, "Creating index...");
        let index_replaced = self.ensure_index().await?;

        info!(data_source = %self.plan.data_source.name, "Creating data source...");
        self.upsert_data_source().await?;

        info!(indexer = %self.plan.indexer.name, "Creating Azure Blob Storage indexer...");
        let indexer_reset = self.ensure_indexer().await?;

        info!(indexer = %self.plan.indexer.name, "Running Azure Blob Storage indexer...");
        let run = self.trigger_run().await?;

        Ok(ProvisioningReport {
            index_replaced,
            indexer_reset,
            run,
        })
    }

    /// Delete the index if present, then create it from the current schema.
    ///
    /// Documents indexed under the previous schema are dropped; the indexer
    /// repopulates the index on its next run.
    ///
    /// Returns whether an existing index was replaced.
    pub async fn ensure_index(&self) -> Result<bool, ProvisioningError> {
        let index = &self.plan.index;
        let wrap = |e| ProvisioningError::index(&index.name, e);

        let exists = self.provider.index_exists(&index.name).await.map_err(wrap)?;
        if exists {
            debug!(index = %index.name, "Deleting existing index");
            self.provider.delete_index(&index.name).await.map_err(wrap)?;
        }
        self.provider.create_index(index).await.map_err(wrap)?;

        Ok(exists)
    }

    /// Create or update the data source in place.
    pub async fn upsert_data_source(&self) -> Result<(), ProvisioningError> {
        let data_source = &self.plan.data_source;
        self.provider
            .create_or_update_data_source(data_source)
            .await
            .map_err(|e| ProvisioningError::data_source(&data_source.name, e))
    }

    /// Reset the indexer if present, then create or update its definition.
    ///
    /// The reset clears the change-tracking high-water mark so documents
    /// already seen by an earlier run are processed again.
    ///
    /// Returns whether an existing indexer was reset.
    pub async fn ensure_indexer(&self) -> Result<bool, ProvisioningError> {
        let indexer = &self.plan.indexer;
        let wrap = |e| ProvisioningError::indexer(&indexer.name, e);

        let exists = self
            .provider
            .indexer_exists(&indexer.name)
            .await
            .map_err(wrap)?;
        if exists {
            debug!(indexer = %indexer.name, "Resetting existing indexer");
            self.provider
                .reset_indexer(&indexer.name)
                .await
                .map_err(wrap)?;
        }
        self.provider
            .create_or_update_indexer(indexer)
            .await
            .map_err(wrap)?;

        Ok(exists)
    }

    /// Ask the service to run the indexer now.
    ///
    /// A rate-limited request is logged and returned as an outcome, not an
    /// error; the schedule still runs the indexer later.
    pub async fn trigger_run(&self) -> Result<RunIndexerOutcome, ProvisioningError> {
        let name = &self.plan.indexer.name;
        let outcome = self
            .provider
            .run_indexer(name)
            .await
            .map_err(|e| ProvisioningError::run(name, e))?;

        if let RunIndexerOutcome::RateLimited { message } = &outcome {
            warn!(indexer = %name, "Failed to run indexer: {}", message);
        }
        Ok(outcome)
    }
}
