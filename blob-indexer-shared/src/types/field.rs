//! Index field definitions.
//!
//! Fields are derived from a record shape rather than written by hand: each
//! Rust type used in a record maps to one EDM type, and the EDM type decides
//! which search attributes the field gets.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Entity Data Model types understood by the search service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    #[serde(rename = "Edm.String")]
    String,
    #[serde(rename = "Edm.Int32")]
    Int32,
    #[serde(rename = "Edm.Int64")]
    Int64,
    #[serde(rename = "Edm.Double")]
    Double,
    #[serde(rename = "Edm.Boolean")]
    Boolean,
    #[serde(rename = "Edm.DateTimeOffset")]
    DateTimeOffset,
    #[serde(rename = "Collection(Edm.String)")]
    StringCollection,
}

impl FieldType {
    /// The type name as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "Edm.String",
            Self::Int32 => "Edm.Int32",
            Self::Int64 => "Edm.Int64",
            Self::Double => "Edm.Double",
            Self::Boolean => "Edm.Boolean",
            Self::DateTimeOffset => "Edm.DateTimeOffset",
            Self::StringCollection => "Collection(Edm.String)",
        }
    }

    /// Whether values of this type are tokenized for full-text search.
    pub fn is_searchable(&self) -> bool {
        matches!(self, Self::String | Self::StringCollection)
    }

    /// Collections cannot be sorted on.
    pub fn is_sortable(&self) -> bool {
        !matches!(self, Self::StringCollection)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single field of an index schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub key: bool,
    pub searchable: bool,
    pub filterable: bool,
    pub sortable: bool,
    pub facetable: bool,
    pub retrievable: bool,
}

impl Field {
    /// Create a field whose attributes follow from its type.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            key: false,
            searchable: field_type.is_searchable(),
            filterable: true,
            sortable: field_type.is_sortable(),
            facetable: true,
            retrievable: true,
        }
    }

    /// Create a field for a Rust type that has an EDM mapping.
    pub fn of<T: IndexableType>(name: impl Into<String>) -> Self {
        Self::new(name, T::FIELD_TYPE)
    }

    /// Mark this field as the document key.
    pub fn as_key(mut self) -> Self {
        self.key = true;
        self.filterable = true;
        self.retrievable = true;
        self
    }
}

/// Rust types that map onto an EDM field type.
pub trait IndexableType {
    const FIELD_TYPE: FieldType;
}

impl IndexableType for String {
    const FIELD_TYPE: FieldType = FieldType::String;
}

impl IndexableType for i32 {
    const FIELD_TYPE: FieldType = FieldType::Int32;
}

impl IndexableType for i64 {
    const FIELD_TYPE: FieldType = FieldType::Int64;
}

impl IndexableType for f64 {
    const FIELD_TYPE: FieldType = FieldType::Double;
}

impl IndexableType for bool {
    const FIELD_TYPE: FieldType = FieldType::Boolean;
}

impl IndexableType for DateTime<Utc> {
    const FIELD_TYPE: FieldType = FieldType::DateTimeOffset;
}

impl IndexableType for Vec<String> {
    const FIELD_TYPE: FieldType = FieldType::StringCollection;
}

// Nullability does not change the EDM type.
impl<T: IndexableType> IndexableType for Option<T> {
    const FIELD_TYPE: FieldType = T::FIELD_TYPE;
}

/// A record shape that can describe its own index fields.
pub trait SearchDocument {
    /// The fields of this record, in declaration order.
    fn fields() -> Vec<Field>;
}
