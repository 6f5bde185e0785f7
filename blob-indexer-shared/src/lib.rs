//! # Blob Indexer Shared
//!
//! This crate defines the resource definitions exchanged with the search
//! service's administrative API: the index and its fields, the blob-storage
//! data source, and the scheduled indexer. It also holds the `Contacts`
//! record shape the index schema is derived from.

pub mod errors;
pub mod types;

pub use errors::DefinitionError;
pub use types::contacts::Contacts;
pub use types::data_source::{
    DataContainer, DataSource, DataSourceCredentials, DataSourceType, DeletionDetectionPolicy,
    SoftDeleteColumnDeletionDetectionPolicy,
};
pub use types::field::{Field, FieldType, IndexableType, SearchDocument};
pub use types::index::Index;
pub use types::indexer::{Indexer, IndexingSchedule};
