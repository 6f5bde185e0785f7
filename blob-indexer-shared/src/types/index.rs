//! Search index definition.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::errors::DefinitionError;
use crate::types::field::{Field, FieldType, SearchDocument};

/// A named index schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    pub name: String,
    pub fields: Vec<Field>,
}

impl Index {
    /// Create an index from an explicit field list.
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Create an index whose fields are derived from a record shape.
    ///
    /// # Example
    ///
    /// ```
    /// use blob_indexer_shared::{Contacts, Index};
    ///
    /// let index = Index::for_document::<Contacts>("index");
    /// assert_eq!(index.key_field().map(|f| f.name.as_str()), Some("id"));
    /// ```
    pub fn for_document<T: SearchDocument>(name: impl Into<String>) -> Self {
        Self::new(name, T::fields())
    }

    /// The field marked as document key, if any.
    pub fn key_field(&self) -> Option<&Field> {
        self.fields.iter().find(|f| f.key)
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Check the schema rules the service would otherwise reject the index for.
    pub fn validate(&self) -> Result<(), DefinitionError> {
        if self.name.is_empty() {
            return Err(DefinitionError::EmptyName { kind: "Index" });
        }
        if self.fields.is_empty() {
            return Err(DefinitionError::NoFields(self.name.clone()));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(DefinitionError::DuplicateField(field.name.clone()));
            }
        }

        let keys: Vec<&Field> = self.fields.iter().filter(|f| f.key).collect();
        match keys.as_slice() {
            [] => Err(DefinitionError::MissingKey(self.name.clone())),
            [key] if key.field_type != FieldType::String => {
                Err(DefinitionError::NonStringKey(key.name.clone()))
            }
            [_] => Ok(()),
            _ => Err(DefinitionError::MultipleKeys {
                index: self.name.clone(),
                count: keys.len(),
            }),
        }
    }
}
