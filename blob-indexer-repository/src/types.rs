//! Request and response types for administrative operations.

use std::fmt;

/// The administrative operations the provisioning workflow issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceOperation {
    IndexExists,
    DeleteIndex,
    CreateIndex,
    CreateOrUpdateDataSource,
    IndexerExists,
    ResetIndexer,
    CreateOrUpdateIndexer,
    RunIndexer,
}

impl ServiceOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IndexExists => "index exists",
            Self::DeleteIndex => "delete index",
            Self::CreateIndex => "create index",
            Self::CreateOrUpdateDataSource => "create or update data source",
            Self::IndexerExists => "indexer exists",
            Self::ResetIndexer => "reset indexer",
            Self::CreateOrUpdateIndexer => "create or update indexer",
            Self::RunIndexer => "run indexer",
        }
    }
}

impl fmt::Display for ServiceOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of asking the service to run an indexer now.
///
/// A rate-limited request is not an error: the indexer keeps its schedule and
/// will run at the next interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunIndexerOutcome {
    /// The service accepted the run request.
    Started,
    /// The service answered 429; `message` is the response body.
    RateLimited { message: String },
}

impl RunIndexerOutcome {
    pub fn is_started(&self) -> bool {
        matches!(self, Self::Started)
    }
}
