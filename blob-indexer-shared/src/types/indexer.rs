//! Indexer definition and its recurring schedule.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::DefinitionError;
use crate::types::iso8601;

/// Shortest interval the service accepts.
pub const MIN_SCHEDULE_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Longest interval the service accepts.
pub const MAX_SCHEDULE_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// How often the service runs an indexer on its own.
///
/// Deserialization applies the same interval range as [`IndexingSchedule::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawIndexingSchedule")]
pub struct IndexingSchedule {
    #[serde(with = "iso8601")]
    interval: Duration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    start_time: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawIndexingSchedule {
    #[serde(with = "iso8601")]
    interval: Duration,
    #[serde(default)]
    start_time: Option<DateTime<Utc>>,
}

impl TryFrom<RawIndexingSchedule> for IndexingSchedule {
    type Error = DefinitionError;

    fn try_from(raw: RawIndexingSchedule) -> Result<Self, Self::Error> {
        let schedule = Self::new(raw.interval)?;
        Ok(match raw.start_time {
            Some(start_time) => schedule.with_start_time(start_time),
            None => schedule,
        })
    }
}

impl IndexingSchedule {
    /// Create a schedule, rejecting intervals outside 5 minutes to 24 hours.
    pub fn new(interval: Duration) -> Result<Self, DefinitionError> {
        if interval < MIN_SCHEDULE_INTERVAL || interval > MAX_SCHEDULE_INTERVAL {
            return Err(DefinitionError::ScheduleOutOfRange {
                interval_secs: interval.as_secs(),
            });
        }
        Ok(Self {
            interval,
            start_time: None,
        })
    }

    /// Run once every 24 hours.
    pub fn daily() -> Self {
        Self {
            interval: MAX_SCHEDULE_INTERVAL,
            start_time: None,
        }
    }

    pub fn with_start_time(mut self, start_time: DateTime<Utc>) -> Self {
        self.start_time = Some(start_time);
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.start_time
    }
}

/// A scheduled job that pulls from a data source into a target index.
///
/// Both references are by name; the service resolves them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Indexer {
    pub name: String,
    pub data_source_name: String,
    pub target_index_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<IndexingSchedule>,
}

impl Indexer {
    pub fn new(
        name: impl Into<String>,
        data_source_name: impl Into<String>,
        target_index_name: impl Into<String>,
        schedule: Option<IndexingSchedule>,
    ) -> Self {
        Self {
            name: name.into(),
            data_source_name: data_source_name.into(),
            target_index_name: target_index_name.into(),
            schedule,
        }
    }
}
