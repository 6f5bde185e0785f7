//! Integration tests for the provisioning workflow.
//!
//! These tests drive the real entry point (`run_with`) against the in-memory
//! `MockSearchService` so every remote call can be observed.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use blob_indexer::config::{
    AZURE_BLOB_STORAGE_CONNECTION_STRING, REQUIRED_SETTINGS, SEARCH_SERVICE_ADMIN_API_KEY,
    SEARCH_SERVICE_NAME,
};
use blob_indexer::{run_with, AppError, AppSettings, ConfigError, ProvisioningError, Settings};
use blob_indexer_repository::{
    MockCall, MockSearchService, RunIndexerOutcome, SearchServiceError, SearchServiceProvider,
    ServiceOperation,
};
use blob_indexer_shared::{Contacts, SearchDocument};

const CONNECTION_STRING: &str = "DefaultEndpointsProtocol=...;AccountKey=...;";

fn valid_settings() -> AppSettings {
    AppSettings::from_pairs([
        (SEARCH_SERVICE_NAME, "svc"),
        (SEARCH_SERVICE_ADMIN_API_KEY, "key123"),
        (AZURE_BLOB_STORAGE_CONNECTION_STRING, CONNECTION_STRING),
    ])
}

/// Returns a connect closure that hands out `service` and counts invocations.
fn connector(
    service: &Arc<MockSearchService>,
    connects: &Arc<AtomicUsize>,
) -> impl FnOnce(&Settings) -> Result<Arc<dyn SearchServiceProvider>, SearchServiceError> {
    let service = service.clone();
    let connects = connects.clone();
    move |_settings: &Settings| {
        connects.fetch_add(1, Ordering::SeqCst);
        Ok(service as Arc<dyn SearchServiceProvider>)
    }
}

#[tokio::test]
async fn test_placeholder_values_exit_before_any_remote_call() {
    for required in &REQUIRED_SETTINGS {
        let service = Arc::new(MockSearchService::new());
        let connects = Arc::new(AtomicUsize::new(0));
        let mut settings = valid_settings();
        settings.set(required.key, required.placeholder);

        let err = run_with(&settings, connector(&service, &connects))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::Config(ConfigError::Placeholder { key }) if key == required.key
        ));
        assert_eq!(err.exit_code(), -1);
        assert_eq!(connects.load(Ordering::SeqCst), 0);
        assert!(service.calls().is_empty());
    }
}

#[tokio::test]
async fn test_fresh_service_gets_one_of_each() {
    let service = Arc::new(MockSearchService::new());
    let connects = Arc::new(AtomicUsize::new(0));

    let report = run_with(&valid_settings(), connector(&service, &connects))
        .await
        .unwrap();

    assert!(!report.index_replaced);
    assert!(!report.indexer_reset);
    assert_eq!(report.run, RunIndexerOutcome::Started);

    assert_eq!(service.index_count(), 1);
    assert_eq!(service.data_source_count(), 1);
    assert_eq!(service.indexer_count(), 1);
    assert_eq!(service.pending_runs("indexer"), 1);
    assert_eq!(
        service.operations(),
        vec![
            ServiceOperation::IndexExists,
            ServiceOperation::CreateIndex,
            ServiceOperation::CreateOrUpdateDataSource,
            ServiceOperation::IndexerExists,
            ServiceOperation::CreateOrUpdateIndexer,
            ServiceOperation::RunIndexer,
        ]
    );
}

#[tokio::test]
async fn test_second_run_replaces_index_and_resets_indexer() {
    let service = Arc::new(MockSearchService::new());
    let connects = Arc::new(AtomicUsize::new(0));

    run_with(&valid_settings(), connector(&service, &connects))
        .await
        .unwrap();
    service.clear_calls();

    let report = run_with(&valid_settings(), connector(&service, &connects))
        .await
        .unwrap();

    assert!(report.index_replaced);
    assert!(report.indexer_reset);
    assert_eq!(connects.load(Ordering::SeqCst), 2);

    assert_eq!(service.index_count(), 1);
    assert_eq!(service.data_source_count(), 1);
    assert_eq!(service.indexer_count(), 1);
    // Reset cleared the first run's request; only the new one is pending.
    assert_eq!(service.pending_runs("indexer"), 1);
    assert_eq!(
        service.calls(),
        vec![
            MockCall::new(ServiceOperation::IndexExists, "index"),
            MockCall::new(ServiceOperation::DeleteIndex, "index"),
            MockCall::new(ServiceOperation::CreateIndex, "index"),
            MockCall::new(ServiceOperation::CreateOrUpdateDataSource, "datasource"),
            MockCall::new(ServiceOperation::IndexerExists, "indexer"),
            MockCall::new(ServiceOperation::ResetIndexer, "indexer"),
            MockCall::new(ServiceOperation::CreateOrUpdateIndexer, "indexer"),
            MockCall::new(ServiceOperation::RunIndexer, "indexer"),
        ]
    );
}

#[tokio::test]
async fn test_rate_limited_run_completes_normally() {
    let service = Arc::new(MockSearchService::new());
    let connects = Arc::new(AtomicUsize::new(0));
    service.rate_limit_runs("indexer");

    let report = run_with(&valid_settings(), connector(&service, &connects))
        .await
        .unwrap();

    assert!(matches!(report.run, RunIndexerOutcome::RateLimited { .. }));
    assert_eq!(service.indexer_count(), 1);
}

#[tokio::test]
async fn test_index_creation_failure_stops_the_workflow() {
    let service = Arc::new(MockSearchService::new());
    let connects = Arc::new(AtomicUsize::new(0));
    service.fail_with_status(ServiceOperation::CreateIndex, 400);

    let err = run_with(&valid_settings(), connector(&service, &connects))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AppError::Provisioning(ProvisioningError::Index { .. })
    ));
    assert_eq!(err.exit_code(), 1);
    assert_eq!(service.data_source_count(), 0);
    assert_eq!(service.indexer_count(), 0);
    assert_eq!(
        service.operations(),
        vec![ServiceOperation::IndexExists, ServiceOperation::CreateIndex]
    );
}

#[tokio::test]
async fn test_indexer_failure_keeps_earlier_resources() {
    let service = Arc::new(MockSearchService::new());
    let connects = Arc::new(AtomicUsize::new(0));
    service.fail_with_status(ServiceOperation::CreateOrUpdateIndexer, 503);

    let err = run_with(&valid_settings(), connector(&service, &connects))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AppError::Provisioning(ProvisioningError::Indexer { .. })
    ));
    assert_eq!(service.index_count(), 1);
    assert_eq!(service.data_source_count(), 1);
    assert!(!service.operations().contains(&ServiceOperation::RunIndexer));
}

#[tokio::test]
async fn test_connect_failure_is_not_a_configuration_error() {
    let err = run_with(&valid_settings(), |_settings: &Settings| {
        Err(SearchServiceError::validation("Invalid search service name"))
    })
    .await
    .unwrap_err();

    assert!(matches!(err, AppError::Provider(_)));
    assert_eq!(err.exit_code(), 1);
}

#[tokio::test]
async fn test_provisioned_resources_match_expected_definitions() {
    let service = Arc::new(MockSearchService::new());
    let connects = Arc::new(AtomicUsize::new(0));

    run_with(&valid_settings(), connector(&service, &connects))
        .await
        .unwrap();

    let index = service.index("index").unwrap();
    assert_eq!(index.fields, Contacts::fields());

    let data_source = service.data_source("datasource").unwrap();
    assert_eq!(data_source.container.name, "contacts");
    assert_eq!(data_source.credentials.connection_string, CONNECTION_STRING);
    let policy = data_source.soft_delete_policy().unwrap();
    assert_eq!(policy.soft_delete_column_name, "isDeleted");
    assert_eq!(policy.soft_delete_marker_value, "true");

    let indexer = service.indexer("indexer").unwrap();
    assert_eq!(indexer.data_source_name, "datasource");
    assert_eq!(indexer.target_index_name, "index");
    assert_eq!(
        indexer.schedule.unwrap().interval(),
        Duration::from_secs(24 * 60 * 60)
    );
}
