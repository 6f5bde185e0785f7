//! Error types for the blob indexer.

use blob_indexer_repository::SearchServiceError;
use blob_indexer_shared::DefinitionError;
use thiserror::Error;

/// Errors raised while loading or validating settings.
///
/// All of these are detected before any remote call is made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The settings file does not exist.
    #[error("Settings file '{path}' was not found")]
    FileNotFound { path: String },

    /// The settings file exists but could not be read.
    #[error("Failed to read settings file '{path}': {message}")]
    Read { path: String, message: String },

    /// The settings file is not a JSON object.
    #[error("Failed to parse settings file '{path}': {message}")]
    Parse { path: String, message: String },

    /// A required key is absent or empty.
    #[error("Specify {key} in appsettings.json")]
    Missing { key: &'static str },

    /// A required key still holds its documented placeholder.
    #[error("Specify {key} in appsettings.json")]
    Placeholder { key: &'static str },

    /// The endpoint override is not a usable URL.
    #[error("Invalid search service endpoint '{value}': {message}")]
    InvalidEndpoint { value: String, message: String },
}

impl ConfigError {
    /// The settings key this error is about, if any.
    pub fn key(&self) -> Option<&'static str> {
        match self {
            Self::Missing { key } | Self::Placeholder { key } => Some(key),
            _ => None,
        }
    }
}

/// Errors that abort the provisioning workflow.
///
/// Each remote step has its own variant so the report names the step that
/// failed; resources created by earlier steps are left in place.
#[derive(Error, Debug)]
pub enum ProvisioningError {
    /// A resource definition was rejected before any call was made.
    #[error("Invalid resource definition: {0}")]
    InvalidDefinition(#[from] DefinitionError),

    #[error("Failed to create index '{name}': {source}")]
    Index {
        name: String,
        source: SearchServiceError,
    },

    #[error("Failed to create data source '{name}': {source}")]
    DataSource {
        name: String,
        source: SearchServiceError,
    },

    #[error("Failed to create indexer '{name}': {source}")]
    Indexer {
        name: String,
        source: SearchServiceError,
    },

    #[error("Failed to run indexer '{name}': {source}")]
    Run {
        name: String,
        source: SearchServiceError,
    },
}

impl ProvisioningError {
    pub fn index(name: impl Into<String>, source: SearchServiceError) -> Self {
        Self::Index {
            name: name.into(),
            source,
        }
    }

    pub fn data_source(name: impl Into<String>, source: SearchServiceError) -> Self {
        Self::DataSource {
            name: name.into(),
            source,
        }
    }

    pub fn indexer(name: impl Into<String>, source: SearchServiceError) -> Self {
        Self::Indexer {
            name: name.into(),
            source,
        }
    }

    pub fn run(name: impl Into<String>, source: SearchServiceError) -> Self {
        Self::Run {
            name: name.into(),
            source,
        }
    }
}
