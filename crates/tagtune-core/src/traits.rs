//! Core traits for tagtune abstractions.
//!
//! These traits define the interfaces that concrete implementations
//! must satisfy, enabling pluggable stores and testability.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{CatalogResponse, TagStatusUpdate, WriteAck, WriteBackDocument};

/// Key/value settings store holding a plugin's tag catalog and overrides.
///
/// Every operation is a single request/response; a write replaces the whole
/// override set atomically from the caller's point of view.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Fetch the tag catalog and process-wide defaults.
    async fn fetch_catalog(&self, plugin: &str) -> Result<CatalogResponse>;

    /// Replace the full per-tag override set.
    async fn replace_overrides(
        &self,
        plugin: &str,
        document: &WriteBackDocument,
    ) -> Result<WriteAck>;

    /// Fetch the enabled flag of every tag, keyed by normalized name.
    async fn fetch_statuses(&self, plugin: &str) -> Result<BTreeMap<String, bool>>;

    /// Update enabled flags without touching any other field.
    async fn update_statuses(&self, plugin: &str, update: &TagStatusUpdate) -> Result<WriteAck>;

    /// Check whether the store is ready to serve requests.
    async fn health_check(&self) -> Result<bool>;
}
