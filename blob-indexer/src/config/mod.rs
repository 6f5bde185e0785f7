//! Configuration loading and dependency wiring for the blob indexer.

mod dependencies;
mod settings;

pub use dependencies::connect_to_search_service;
pub use settings::{
    AppSettings, RequiredSetting, Settings, AZURE_BLOB_STORAGE_CONNECTION_STRING,
    DEFAULT_SETTINGS_FILE, REQUIRED_SETTINGS, SEARCH_SERVICE_ADMIN_API_KEY,
    SEARCH_SERVICE_ENDPOINT, SEARCH_SERVICE_NAME, SETTINGS_PATH_ENV,
};
