//! Errors raised while building resource definitions.

use thiserror::Error;

/// A resource definition violates a rule the search service enforces.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    /// A resource was given an empty name.
    #[error("{kind} name cannot be empty")]
    EmptyName { kind: &'static str },

    /// The index has no fields.
    #[error("Index '{0}' must define at least one field")]
    NoFields(String),

    /// The index has no key field.
    #[error("Index '{0}' must define exactly one key field, found none")]
    MissingKey(String),

    /// The index has more than one key field.
    #[error("Index '{index}' must define exactly one key field, found {count}")]
    MultipleKeys { index: String, count: usize },

    /// The key field is not a string.
    #[error("Key field '{0}' must be of type Edm.String")]
    NonStringKey(String),

    /// Two fields share a name.
    #[error("Field '{0}' is defined more than once")]
    DuplicateField(String),

    /// The schedule interval is outside the range the service accepts.
    #[error("Schedule interval of {interval_secs}s is outside the allowed range of 5 minutes to 24 hours")]
    ScheduleOutOfRange { interval_secs: u64 },
}
