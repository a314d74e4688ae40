//! In-memory settings store for deterministic testing.
//!
//! Behaves like the host's table-backed store: a write replaces the override
//! set, so rows missing from the document fall back to their defaults, and the
//! next read reflects the result in the same textual form the host would
//! return.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tagtune_store::mock::MemorySettingsStore;
//! use tagtune_core::{CatalogEntry, SettingsStore};
//!
//! #[tokio::test]
//! async fn test_with_memory_store() {
//!     let store = MemorySettingsStore::new()
//!         .with_entry(CatalogEntry::named("Kissing", "Sexual Actions"))
//!         .with_write_failure("disk full");
//!
//!     let catalog = store.fetch_catalog("skier_aitagging").await.unwrap();
//!     assert_eq!(catalog.tags.len(), 1);
//! }
//! ```

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::debug;

use tagtune_core::logging::SUBSYSTEM_STORE;
use tagtune_core::{
    is_reserved_tag_name, normalize_tag_key, ActiveModel, CatalogEntry, CatalogResponse, Error,
    Result, SettingsStore, TagDefaults, TagOverride, TagStatusUpdate, WriteAck,
    WriteBackDocument,
};

/// In-memory settings store.
#[derive(Clone, Default)]
pub struct MemorySettingsStore {
    state: Arc<Mutex<MemoryState>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    entries: Vec<CatalogEntry>,
    defaults: TagDefaults,
    models: Vec<ActiveModel>,
    loaded_categories: Vec<String>,
    read_failure: Option<String>,
    catalog_error: Option<String>,
    write_failure: Option<String>,
    not_ready: bool,
    documents: Vec<WriteBackDocument>,
    calls: Vec<StoreCall>,
}

/// A recorded store operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreCall {
    pub operation: String,
    pub plugin: String,
}

impl MemorySettingsStore {
    /// Create an empty, ready store.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Append a catalog row.
    pub fn with_entry(self, entry: CatalogEntry) -> Self {
        self.state().entries.push(entry);
        self
    }

    /// Append catalog rows.
    pub fn with_entries(self, entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        self.state().entries.extend(entries);
        self
    }

    /// Set the process-wide defaults row.
    pub fn with_defaults(self, defaults: TagDefaults) -> Self {
        self.state().defaults = defaults;
        self
    }

    /// Set the models reported as active.
    pub fn with_models(self, models: Vec<ActiveModel>) -> Self {
        self.state().models = models;
        self
    }

    /// Set the categories reported as loaded by active models.
    pub fn with_loaded_categories(self, categories: Vec<String>) -> Self {
        self.state().loaded_categories = categories;
        self
    }

    /// Fail every read with the given message.
    pub fn with_read_failure(self, message: impl Into<String>) -> Self {
        self.set_read_failure(Some(message.into()));
        self
    }

    /// Answer catalog reads with a response carrying this `error` string.
    pub fn with_catalog_error(self, message: impl Into<String>) -> Self {
        self.set_catalog_error(Some(message.into()));
        self
    }

    /// Fail every write with the given message.
    pub fn with_write_failure(self, message: impl Into<String>) -> Self {
        self.set_write_failure(Some(message.into()));
        self
    }

    pub fn set_read_failure(&self, message: Option<String>) {
        self.state().read_failure = message;
    }

    pub fn set_catalog_error(&self, message: Option<String>) {
        self.state().catalog_error = message;
    }

    pub fn set_write_failure(&self, message: Option<String>) {
        self.state().write_failure = message;
    }

    pub fn set_ready(&self, ready: bool) {
        self.state().not_ready = !ready;
    }

    /// Current catalog rows, with every accepted write applied.
    pub fn entries(&self) -> Vec<CatalogEntry> {
        self.state().entries.clone()
    }

    /// Every write-back document accepted so far, oldest first.
    pub fn documents(&self) -> Vec<WriteBackDocument> {
        self.state().documents.clone()
    }

    /// Most recent accepted write-back document.
    pub fn last_document(&self) -> Option<WriteBackDocument> {
        self.state().documents.last().cloned()
    }

    /// Get all logged calls for assertion.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.state().calls.clone()
    }

    /// Number of logged calls of one operation.
    pub fn call_count(&self, operation: &str) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|c| c.operation == operation)
            .count()
    }

    /// Clear the call log.
    pub fn clear_calls(&self) {
        self.state().calls.clear()
    }

    fn record(state: &mut MemoryState, operation: &str, plugin: &str) {
        debug!(
            subsystem = SUBSYSTEM_STORE,
            component = "memory",
            op = operation,
            plugin,
            "Memory store call"
        );
        state.calls.push(StoreCall {
            operation: operation.to_string(),
            plugin: plugin.to_string(),
        });
    }

    fn statuses(state: &MemoryState) -> BTreeMap<String, bool> {
        state
            .entries
            .iter()
            .filter_map(|e| e.display_name().map(|n| (n, e.enabled)))
            .filter(|(name, _)| !is_reserved_tag_name(name))
            .map(|(name, enabled)| (normalize_tag_key(name), enabled.unwrap_or(true)))
            .collect()
    }
}

/// Write an override onto a catalog row the way the host persists it.
fn apply_override(entry: &mut CatalogEntry, o: &TagOverride) {
    entry.enabled = Some(o.enabled);
    entry.markers_enabled = Some(o.markers_enabled);
    entry.required_scene_tag_duration = o
        .required_scene_tag_duration
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string();
    entry.min_marker_duration = o.min_marker_duration.map(|v| v.to_string()).unwrap_or_default();
    entry.max_gap = o.max_gap.map(|v| v.to_string()).unwrap_or_default();
}

/// Drop every override from a catalog row.
fn clear_override(entry: &mut CatalogEntry) {
    entry.enabled = None;
    entry.markers_enabled = None;
    entry.required_scene_tag_duration.clear();
    entry.min_marker_duration.clear();
    entry.max_gap.clear();
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn fetch_catalog(&self, plugin: &str) -> Result<CatalogResponse> {
        let mut state = self.state();
        Self::record(&mut state, "fetch_catalog", plugin);
        if let Some(msg) = &state.read_failure {
            return Err(Error::Request(msg.clone()));
        }

        if let Some(msg) = &state.catalog_error {
            return Ok(CatalogResponse {
                error: Some(msg.clone()),
                ..Default::default()
            });
        }

        Ok(CatalogResponse {
            tags: state.entries.clone(),
            defaults: state.defaults.clone(),
            models: state.models.clone(),
            loaded_categories: state.loaded_categories.clone(),
            error: None,
        })
    }

    async fn replace_overrides(
        &self,
        plugin: &str,
        document: &WriteBackDocument,
    ) -> Result<WriteAck> {
        let mut state = self.state();
        Self::record(&mut state, "replace_overrides", plugin);
        if let Some(msg) = &state.write_failure {
            return Err(Error::Request(msg.clone()));
        }

        for entry in state.entries.iter_mut() {
            let Some(name) = entry.display_name() else {
                continue;
            };
            if is_reserved_tag_name(name) {
                continue;
            }
            match document.tag_settings.get(&normalize_tag_key(name)) {
                Some(o) => apply_override(entry, o),
                None => clear_override(entry),
            }
        }
        state.documents.push(document.clone());
        Ok(WriteAck::ok(document.len()))
    }

    async fn fetch_statuses(&self, plugin: &str) -> Result<BTreeMap<String, bool>> {
        let mut state = self.state();
        Self::record(&mut state, "fetch_statuses", plugin);
        if let Some(msg) = &state.read_failure {
            return Err(Error::Request(msg.clone()));
        }
        Ok(Self::statuses(&state))
    }

    async fn update_statuses(&self, plugin: &str, update: &TagStatusUpdate) -> Result<WriteAck> {
        let mut state = self.state();
        Self::record(&mut state, "update_statuses", plugin);
        if let Some(msg) = &state.write_failure {
            return Err(Error::Request(msg.clone()));
        }

        let mut statuses = Self::statuses(&state);
        let updated = update.apply_to(&mut statuses);
        for entry in state.entries.iter_mut() {
            let Some(key) = entry.display_name().map(normalize_tag_key) else {
                continue;
            };
            if let Some(enabled) = statuses.get(&key) {
                entry.enabled = Some(*enabled);
            }
        }
        Ok(WriteAck::ok(updated))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(!self.state().not_ready)
    }
}
