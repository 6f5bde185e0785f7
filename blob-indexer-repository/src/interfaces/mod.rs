//! Interface definitions for the search service provider.
//!
//! This module defines the abstract `SearchServiceProvider` trait that allows
//! the provisioning workflow to run against the live service or a mock.

mod search_service_provider;

pub use search_service_provider::SearchServiceProvider;
