//! Configuration types for the AzureSearchProvider.

use std::fmt;
use std::time::Duration;

use url::Url;

use crate::errors::SearchServiceError;

/// REST API version sent with every request.
pub const DEFAULT_API_VERSION: &str = "2020-06-30";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for the search service's administrative API.
#[derive(Clone)]
pub struct AzureSearchConfig {
    /// Base URL of the service, e.g. `https://my-service.search.windows.net`.
    pub endpoint: Url,
    /// Admin API key sent in the `api-key` header.
    pub api_key: String,
    /// Value of the `api-version` query parameter.
    pub api_version: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl AzureSearchConfig {
    /// Build the config for a service name on the public cloud.
    ///
    /// # Arguments
    ///
    /// * `service_name` - The search service name (the host's first label)
    /// * `api_key` - An admin API key for the service
    ///
    /// # Returns
    ///
    /// * `Ok(AzureSearchConfig)` - Config pointing at `https://{service_name}.search.windows.net`
    /// * `Err(SearchServiceError)` - If the service name does not form a valid host
    pub fn for_service(
        service_name: &str,
        api_key: impl Into<String>,
    ) -> Result<Self, SearchServiceError> {
        if service_name.is_empty()
            || !service_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(SearchServiceError::validation(format!(
                "Invalid search service name '{}'",
                service_name
            )));
        }
        let endpoint = Url::parse(&format!("https://{}.search.windows.net", service_name))
            .map_err(|e| SearchServiceError::validation(e.to_string()))?;
        Ok(Self::with_endpoint(endpoint, api_key))
    }

    /// Build the config for an explicit endpoint.
    pub fn with_endpoint(endpoint: Url, api_key: impl Into<String>) -> Self {
        Self {
            endpoint,
            api_key: api_key.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl fmt::Debug for AzureSearchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureSearchConfig")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_key", &"<redacted>")
            .field("api_version", &self.api_version)
            .field("timeout", &self.timeout)
            .finish()
    }
}
