//! # Blob Indexer
//!
//! Provisions a search index over an Azure Blob Storage container and kicks
//! off the first indexing run.
//!
//! ## Workflow
//!
//! 1. **Settings**: load `appsettings.json` and reject placeholder values
//! 2. **Index**: delete and recreate the index from the `Contacts` shape
//! 3. **Data source**: create or update the blob container data source
//! 4. **Indexer**: reset if present, then create or update with a daily schedule
//! 5. **Run**: request an immediate run, tolerating a rate-limit response
//!
//! ## Modules
//!
//! - [`config`]: Settings loading, validation and client construction
//! - [`provisioner`]: The provisioning workflow
//! - [`errors`]: Error types for configuration and provisioning

pub mod config;
pub mod errors;
pub mod provisioner;

use std::sync::Arc;

pub use config::{connect_to_search_service, AppSettings, Settings};
pub use errors::{ConfigError, ProvisioningError};
pub use provisioner::{Provisioner, ProvisioningPlan, ProvisioningReport};

use blob_indexer_repository::{SearchServiceError, SearchServiceProvider};
use thiserror::Error;

/// Exit status for a missing or placeholder configuration value.
pub const MISSING_CONFIGURATION_EXIT_CODE: i32 = -1;

/// Exit status for any other failure.
pub const FAILURE_EXIT_CODE: i32 = 1;

/// Errors that can occur during startup or provisioning.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The search service client could not be created.
    #[error("Failed to connect to search service: {0}")]
    Provider(#[from] SearchServiceError),

    /// A provisioning step failed.
    #[error("Provisioning error: {0}")]
    Provisioning(#[from] ProvisioningError),
}

impl AppError {
    /// The process exit status for this error.
    ///
    /// Only a missing or placeholder value maps to `-1`; an unreadable
    /// settings file or a bad endpoint is an ordinary failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(e) if e.key().is_some() => MISSING_CONFIGURATION_EXIT_CODE,
            Self::Config(_) | Self::Provider(_) | Self::Provisioning(_) => FAILURE_EXIT_CODE,
        }
    }
}

/// Validate settings, connect, and run the provisioning workflow.
///
/// `connect` is only invoked once the settings are valid, so a configuration
/// error never results in a remote call.
pub async fn run_with<F>(settings: &AppSettings, connect: F) -> Result<ProvisioningReport, AppError>
where
    F: FnOnce(&Settings) -> Result<Arc<dyn SearchServiceProvider>, SearchServiceError>,
{
    let settings = settings.validate()?;
    let provider = connect(&settings)?;
    let provisioner = Provisioner::new(provider, ProvisioningPlan::from_settings(&settings));
    Ok(provisioner.run().await?)
}
