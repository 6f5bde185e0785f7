//! Data source definition for Azure Blob Storage.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The `@odata.type` discriminator for soft-delete detection.
pub const SOFT_DELETE_POLICY_ODATA_TYPE: &str =
    "#Microsoft.Azure.Search.SoftDeleteColumnDeletionDetectionPolicy";

/// Kind of storage a data source points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSourceType {
    #[serde(rename = "azureblob")]
    AzureBlob,
}

/// Connection credentials for a data source.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSourceCredentials {
    pub connection_string: String,
}

impl fmt::Debug for DataSourceCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataSourceCredentials")
            .field("connection_string", &"<redacted>")
            .finish()
    }
}

/// The container (and optional virtual folder) the indexer reads from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataContainer {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

/// Treats a document as deleted when a column holds a marker value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoftDeleteColumnDeletionDetectionPolicy {
    pub soft_delete_column_name: String,
    pub soft_delete_marker_value: String,
}

impl SoftDeleteColumnDeletionDetectionPolicy {
    pub fn new(column: impl Into<String>, marker: impl Into<String>) -> Self {
        Self {
            soft_delete_column_name: column.into(),
            soft_delete_marker_value: marker.into(),
        }
    }
}

/// Deletion detection policies, tagged by their OData type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "@odata.type")]
pub enum DeletionDetectionPolicy {
    #[serde(rename = "#Microsoft.Azure.Search.SoftDeleteColumnDeletionDetectionPolicy")]
    SoftDeleteColumn(SoftDeleteColumnDeletionDetectionPolicy),
}

impl From<SoftDeleteColumnDeletionDetectionPolicy> for DeletionDetectionPolicy {
    fn from(policy: SoftDeleteColumnDeletionDetectionPolicy) -> Self {
        Self::SoftDeleteColumn(policy)
    }
}

/// A named pointer to an external container plus its deletion policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSource {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: DataSourceType,
    pub credentials: DataSourceCredentials,
    pub container: DataContainer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_deletion_detection_policy: Option<DeletionDetectionPolicy>,
}

impl DataSource {
    /// Create a data source over an Azure Blob Storage container.
    pub fn azure_blob_storage(
        name: impl Into<String>,
        storage_connection_string: impl Into<String>,
        container_name: impl Into<String>,
        deletion_detection_policy: Option<DeletionDetectionPolicy>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: DataSourceType::AzureBlob,
            credentials: DataSourceCredentials {
                connection_string: storage_connection_string.into(),
            },
            container: DataContainer {
                name: container_name.into(),
                query: None,
            },
            data_deletion_detection_policy: deletion_detection_policy,
        }
    }

    /// The soft-delete policy, if that is the configured deletion policy.
    pub fn soft_delete_policy(&self) -> Option<&SoftDeleteColumnDeletionDetectionPolicy> {
        match &self.data_deletion_detection_policy {
            Some(DeletionDetectionPolicy::SoftDeleteColumn(policy)) => Some(policy),
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data_source() -> DataSource {
        DataSource::azure_blob_storage(
            "datasource",
            "DefaultEndpointsProtocol=https;AccountName=acct;AccountKey=secret;",
            "contacts",
            Some(SoftDeleteColumnDeletionDetectionPolicy::new("isDeleted", "true").into()),
        )
    }

    #[test]
    fn test_serialization_shape() {
        let json = serde_json::to_value(data_source()).unwrap();

        assert_eq!(json["name"], "datasource");
        assert_eq!(json["type"], "azureblob");
        assert_eq!(json["container"]["name"], "contacts");
        assert!(json["container"].get("query").is_none());
        assert_eq!(
            json["credentials"]["connectionString"],
            "DefaultEndpointsProtocol=https;AccountName=acct;AccountKey=secret;"
        );

        let policy = &json["dataDeletionDetectionPolicy"];
        assert_eq!(policy["@odata.type"], SOFT_DELETE_POLICY_ODATA_TYPE);
        assert_eq!(policy["softDeleteColumnName"], "isDeleted");
        assert_eq!(policy["softDeleteMarkerValue"], "true");
    }

    #[test]
    fn test_deserialize_policy() {
        let source: DataSource =
            serde_json::from_value(serde_json::to_value(data_source()).unwrap()).unwrap();

        let policy = source.soft_delete_policy().unwrap();
        assert_eq!(policy.soft_delete_column_name, "isDeleted");
        assert_eq!(policy.soft_delete_marker_value, "true");
    }

    #[test]
    fn test_no_policy_is_omitted() {
        let source = DataSource::azure_blob_storage("ds", "conn", "c", None);
        let json = serde_json::to_value(&source).unwrap();

        assert!(json.get("dataDeletionDetectionPolicy").is_none());
        assert!(source.soft_delete_policy().is_none());
    }

    #[test]
    fn test_debug_redacts_connection_string() {
        let rendered = format!("{:?}", data_source());

        assert!(!rendered.contains("AccountKey=secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
