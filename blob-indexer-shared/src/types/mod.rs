//! Resource definitions for the search service.
//!
//! Each submodule maps one administrative resource to the JSON shape the
//! service expects.

pub mod contacts;
pub mod data_source;
pub mod field;
pub mod index;
pub mod indexer;
pub mod iso8601;
