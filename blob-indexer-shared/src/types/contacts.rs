//! The contact record stored as JSON blobs in the `contacts` container.

use serde::{Deserialize, Serialize};

use crate::types::field::{Field, SearchDocument};

/// A contact as it appears in blob storage and in the search index.
///
/// The field list returned by [`SearchDocument::fields`] uses the same names
/// as the serialized record, so documents pulled from the container map onto
/// the index without field mappings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contacts {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub city: String,
    pub tags: Vec<String>,
    /// Soft-delete marker; a blob with `isDeleted = true` is removed from the index.
    pub is_deleted: bool,
}

impl SearchDocument for Contacts {
    fn fields() -> Vec<Field> {
        vec![
            Field::of::<String>("id").as_key(),
            Field::of::<String>("name"),
            Field::of::<String>("email"),
            Field::of::<String>("phone"),
            Field::of::<String>("company"),
            Field::of::<String>("city"),
            Field::of::<Vec<String>>("tags"),
            Field::of::<bool>("isDeleted"),
        ]
    }
}
