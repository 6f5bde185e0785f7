//! Builds the search service client from validated settings.

use std::sync::Arc;

use blob_indexer_repository::{
    AzureSearchConfig, AzureSearchProvider, SearchServiceError, SearchServiceProvider,
};
use tracing::info;

use crate::config::Settings;

/// Create the administrative client authenticated with the admin key.
///
/// Uses the endpoint override when present, otherwise the public endpoint
/// derived from the service name.
///
/// # Returns
///
/// * `Ok(Arc<dyn SearchServiceProvider>)` - A ready client
/// * `Err(SearchServiceError)` - If the service name or key cannot be used
pub fn connect_to_search_service(
    settings: &Settings,
) -> Result<Arc<dyn SearchServiceProvider>, SearchServiceError> {
    let config = match &settings.endpoint {
        Some(endpoint) => {
            AzureSearchConfig::with_endpoint(endpoint.clone(), settings.admin_api_key.clone())
        }
        None => AzureSearchConfig::for_service(
            &settings.search_service_name,
            settings.admin_api_key.clone(),
        )?,
    };

    info!(
        search_service = %settings.search_service_name,
        endpoint = %config.endpoint,
        "Connecting to search service"
    );

    let provider = AzureSearchProvider::new(config)?;
    Ok(Arc::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn settings(name: &str, endpoint: Option<&str>) -> Settings {
        Settings {
            search_service_name: name.to_string(),
            admin_api_key: "key123".to_string(),
            storage_connection_string: "conn".to_string(),
            endpoint: endpoint.map(|e| Url::parse(e).unwrap()),
        }
    }

    #[test]
    fn test_connect_with_service_name() {
        assert!(connect_to_search_service(&settings("svc", None)).is_ok());
    }

    #[test]
    fn test_connect_rejects_bad_service_name() {
        let result = connect_to_search_service(&settings("svc.example.com/x", None));
        assert!(matches!(result, Err(SearchServiceError::ValidationError(_))));
    }

    #[test]
    fn test_endpoint_override_skips_name_check() {
        let result =
            connect_to_search_service(&settings("not a host", Some("http://localhost:8080")));
        assert!(result.is_ok());
    }
}
