//! Azure Cognitive Search provider implementation.
//!
//! This module provides the concrete implementation of `SearchServiceProvider`
//! over the service's REST API using `reqwest`.

use async_trait::async_trait;
use blob_indexer_shared::{DataSource, Index, Indexer};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_LENGTH};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use tracing::{debug, error, info};
use url::Url;

use crate::config::AzureSearchConfig;
use crate::errors::SearchServiceError;
use crate::interfaces::SearchServiceProvider;
use crate::types::{RunIndexerOutcome, ServiceOperation};

/// Header carrying the admin API key.
pub const API_KEY_HEADER: &str = "api-key";

/// Search service provider backed by the administrative REST API.
///
/// # Example
///
/// ```ignore
/// use blob_indexer_repository::{AzureSearchConfig, AzureSearchProvider};
///
/// let config = AzureSearchConfig::for_service("my-service", admin_key)?;
/// let provider = AzureSearchProvider::new(config)?;
/// if provider.index_exists("index").await? {
///     provider.delete_index("index").await?;
/// }
/// ```
pub struct AzureSearchProvider {
    client: Client,
    config: AzureSearchConfig,
}

impl AzureSearchProvider {
    /// Create a provider for the configured endpoint.
    ///
    /// # Returns
    ///
    /// * `Ok(AzureSearchProvider)` - A new provider instance
    /// * `Err(SearchServiceError)` - If the key is not a valid header value or
    ///   the HTTP client cannot be built
    pub fn new(config: AzureSearchConfig) -> Result<Self, SearchServiceError> {
        let mut api_key = HeaderValue::from_str(&config.api_key).map_err(|_| {
            SearchServiceError::validation("Admin API key contains invalid header characters")
        })?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, api_key);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| SearchServiceError::connection(e.to_string()))?;

        info!(
            endpoint = %config.endpoint,
            api_version = %config.api_version,
            "Created Azure Search provider"
        );

        Ok(Self { client, config })
    }

    /// Build `{endpoint}/{segments...}?api-version=...`.
    fn url(&self, segments: &[&str]) -> Result<Url, SearchServiceError> {
        let mut url = self.config.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| {
                SearchServiceError::validation(format!(
                    "Endpoint '{}' cannot be used as a base URL",
                    self.config.endpoint
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        url.query_pairs_mut()
            .append_pair("api-version", &self.config.api_version);
        Ok(url)
    }

    async fn send(
        operation: ServiceOperation,
        request: RequestBuilder,
    ) -> Result<Response, SearchServiceError> {
        request
            .send()
            .await
            .map_err(|e| SearchServiceError::connection(format!("{}: {}", operation, e)))
    }

    /// Turn any status outside `accepted` into a `StatusError` carrying the body.
    async fn expect_status(
        operation: ServiceOperation,
        response: Response,
        accepted: &[StatusCode],
    ) -> Result<StatusCode, SearchServiceError> {
        let status = response.status();
        if accepted.contains(&status) {
            return Ok(status);
        }

        let body = response.text().await.unwrap_or_default();
        error!(
            operation = %operation,
            status = %status,
            body = %body,
            "Search service request failed"
        );
        Err(SearchServiceError::status(operation, status.as_u16(), body))
    }

    async fn exists(
        &self,
        operation: ServiceOperation,
        segments: &[&str],
    ) -> Result<bool, SearchServiceError> {
        let url = self.url(segments)?;
        let response = Self::send(operation, self.client.get(url)).await?;
        let status =
            Self::expect_status(operation, response, &[StatusCode::OK, StatusCode::NOT_FOUND])
                .await?;
        Ok(status == StatusCode::OK)
    }
}

#[async_trait]
impl SearchServiceProvider for AzureSearchProvider {
    async fn index_exists(&self, name: &str) -> Result<bool, SearchServiceError> {
        self.exists(ServiceOperation::IndexExists, &["indexes", name])
            .await
    }

    async fn delete_index(&self, name: &str) -> Result<(), SearchServiceError> {
        let operation = ServiceOperation::DeleteIndex;
        let url = self.url(&["indexes", name])?;
        let response = Self::send(operation, self.client.delete(url)).await?;

        // 404 is acceptable - index may already be gone
        Self::expect_status(
            operation,
            response,
            &[StatusCode::OK, StatusCode::NO_CONTENT, StatusCode::NOT_FOUND],
        )
        .await?;

        debug!(index = %name, "Index deleted");
        Ok(())
    }

    async fn create_index(&self, index: &Index) -> Result<(), SearchServiceError> {
        let operation = ServiceOperation::CreateIndex;
        let url = self.url(&["indexes"])?;
        let response = Self::send(operation, self.client.post(url).json(index)).await?;
        Self::expect_status(operation, response, &[StatusCode::CREATED]).await?;

        debug!(index = %index.name, fields = index.fields.len(), "Index created");
        Ok(())
    }

    async fn create_or_update_data_source(
        &self,
        data_source: &DataSource,
    ) -> Result<(), SearchServiceError> {
        let operation = ServiceOperation::CreateOrUpdateDataSource;
        let url = self.url(&["datasources", &data_source.name])?;
        let response = Self::send(operation, self.client.put(url).json(data_source)).await?;
        let status = Self::expect_status(
            operation,
            response,
            &[StatusCode::OK, StatusCode::CREATED, StatusCode::NO_CONTENT],
        )
        .await?;

        debug!(
            data_source = %data_source.name,
            container = %data_source.container.name,
            created = status == StatusCode::CREATED,
            "Data source saved"
        );
        Ok(())
    }

    async fn indexer_exists(&self, name: &str) -> Result<bool, SearchServiceError> {
        self.exists(ServiceOperation::IndexerExists, &["indexers", name])
            .await
    }

    async fn reset_indexer(&self, name: &str) -> Result<(), SearchServiceError> {
        let operation = ServiceOperation::ResetIndexer;
        let url = self.url(&["indexers", name, "reset"])?;
        let request = self.client.post(url).header(CONTENT_LENGTH, 0);
        let response = Self::send(operation, request).await?;
        Self::expect_status(operation, response, &[StatusCode::OK, StatusCode::NO_CONTENT])
            .await?;

        debug!(indexer = %name, "Indexer reset");
        Ok(())
    }

    async fn create_or_update_indexer(
        &self,
        indexer: &Indexer,
    ) -> Result<(), SearchServiceError> {
        let operation = ServiceOperation::CreateOrUpdateIndexer;
        let url = self.url(&["indexers", &indexer.name])?;
        let response = Self::send(operation, self.client.put(url).json(indexer)).await?;
        let status = Self::expect_status(
            operation,
            response,
            &[StatusCode::OK, StatusCode::CREATED, StatusCode::NO_CONTENT],
        )
        .await?;

        debug!(
            indexer = %indexer.name,
            data_source = %indexer.data_source_name,
            target_index = %indexer.target_index_name,
            created = status == StatusCode::CREATED,
            "Indexer saved"
        );
        Ok(())
    }

    async fn run_indexer(&self, name: &str) -> Result<RunIndexerOutcome, SearchServiceError> {
        let operation = ServiceOperation::RunIndexer;
        let url = self.url(&["indexers", name, "run"])?;
        let request = self.client.post(url).header(CONTENT_LENGTH, 0);
        let response = Self::send(operation, request).await?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            let message = response
                .text()
                .await
                .map_err(|e| SearchServiceError::parse(e.to_string()))?;
            return Ok(RunIndexerOutcome::RateLimited { message });
        }

        Self::expect_status(operation, response, &[StatusCode::OK, StatusCode::ACCEPTED])
            .await?;

        debug!(indexer = %name, "Indexer run requested");
        Ok(RunIndexerOutcome::Started)
    }
}
