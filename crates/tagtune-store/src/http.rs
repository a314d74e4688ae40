//! HTTP settings store client.

use std::collections::BTreeMap;
use std::time::Instant;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use tagtune_core::defaults::SETTINGS_ROUTE_PREFIX;
use tagtune_core::logging::{SLOW_REQUEST_MS, SUBSYSTEM_STORE};
use tagtune_core::{
    CatalogResponse, Error, Result, SettingsStore, TagStatusUpdate, TagStatuses, WriteAck,
    WriteBackDocument,
};

use crate::config::StoreConfig;
use crate::error_body::error_from_response;

/// Settings store reached over the host's plugin settings API.
pub struct HttpSettingsStore {
    client: Client,
    config: StoreConfig,
}

impl HttpSettingsStore {
    /// Create a client with the given configuration.
    pub fn new(config: StoreConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            subsystem = SUBSYSTEM_STORE,
            component = "http",
            base_url = %config.base_url,
            plugin = %config.plugin_id,
            timeout_secs = config.timeout_secs,
            "Initializing settings store client"
        );

        Ok(Self { client, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(StoreConfig::from_env())
    }

    /// Get the current configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// URL of a tag endpoint for a plugin.
    pub fn tags_url(&self, plugin: &str, endpoint: &str) -> String {
        format!(
            "{}{}/{}/tags/{}",
            self.config.base_url.trim_end_matches('/'),
            SETTINGS_ROUTE_PREFIX,
            plugin,
            endpoint
        )
    }

    fn check_plugin(plugin: &str) -> Result<()> {
        if plugin.trim().is_empty() {
            return Err(Error::InvalidInput(
                "plugin identifier cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_from_response(status.as_u16(), &body));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Serialization(format!("Failed to parse store response: {}", e)))
    }

    fn log_elapsed(op: &str, start: Instant) {
        let elapsed = start.elapsed().as_millis() as u64;
        debug!(op, duration_ms = elapsed, "Store request complete");
        if elapsed > SLOW_REQUEST_MS {
            warn!(op, duration_ms = elapsed, slow = true, "Slow settings store request");
        }
    }
}

#[async_trait]
impl SettingsStore for HttpSettingsStore {
    #[instrument(skip(self), fields(subsystem = SUBSYSTEM_STORE, component = "http", op = "fetch_catalog"))]
    async fn fetch_catalog(&self, plugin: &str) -> Result<CatalogResponse> {
        Self::check_plugin(plugin)?;
        let start = Instant::now();
        let url = self.tags_url(plugin, "available");
        debug!(%url, "Fetching tag catalog");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Request(format!("Settings store unreachable: {}", e)))?;
        let catalog: CatalogResponse = Self::read_json(response).await?;

        Self::log_elapsed("fetch_catalog", start);
        debug!(tag_count = catalog.tags.len(), "Tag catalog received");
        Ok(catalog)
    }

    #[instrument(skip(self, document), fields(subsystem = SUBSYSTEM_STORE, component = "http", op = "replace_overrides", tag_count = document.len()))]
    async fn replace_overrides(
        &self,
        plugin: &str,
        document: &WriteBackDocument,
    ) -> Result<WriteAck> {
        Self::check_plugin(plugin)?;
        let start = Instant::now();
        let url = self.tags_url(plugin, "settings");
        debug!(%url, "Replacing tag overrides");

        let response = self
            .client
            .put(&url)
            .json(document)
            .send()
            .await
            .map_err(|e| Error::Request(format!("Settings store unreachable: {}", e)))?;
        let ack: WriteAck = Self::read_json(response).await?;

        Self::log_elapsed("replace_overrides", start);
        Ok(ack)
    }

    #[instrument(skip(self), fields(subsystem = SUBSYSTEM_STORE, component = "http", op = "fetch_statuses"))]
    async fn fetch_statuses(&self, plugin: &str) -> Result<BTreeMap<String, bool>> {
        Self::check_plugin(plugin)?;
        let start = Instant::now();

        let response = self
            .client
            .get(self.tags_url(plugin, "statuses"))
            .send()
            .await
            .map_err(|e| Error::Request(format!("Settings store unreachable: {}", e)))?;
        let statuses: TagStatuses = Self::read_json(response).await?;

        Self::log_elapsed("fetch_statuses", start);
        Ok(statuses.statuses)
    }

    #[instrument(skip(self, update), fields(subsystem = SUBSYSTEM_STORE, component = "http", op = "update_statuses"))]
    async fn update_statuses(&self, plugin: &str, update: &TagStatusUpdate) -> Result<WriteAck> {
        Self::check_plugin(plugin)?;
        let start = Instant::now();

        let response = self
            .client
            .put(self.tags_url(plugin, "statuses"))
            .json(update)
            .send()
            .await
            .map_err(|e| Error::Request(format!("Settings store unreachable: {}", e)))?;
        let ack: WriteAck = Self::read_json(response).await?;

        Self::log_elapsed("update_statuses", start);
        Ok(ack)
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!(
            "{}{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.ready_path
        );
        match self.client.get(&url).send().await {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(e) => {
                debug!(subsystem = SUBSYSTEM_STORE, error = %e, "Readiness probe failed");
                Ok(false)
            }
        }
    }
}
