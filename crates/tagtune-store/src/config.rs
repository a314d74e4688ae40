//! Settings store client configuration.
//!
//! Configuration is built from [`StoreConfig::default`] or from `TAGTUNE_*`
//! environment variables, and checked with [`StoreConfig::validate`] before a
//! client is constructed.

use std::time::Duration;

use tagtune_core::defaults;
use tagtune_core::{Error, Result};

/// Configuration for [`crate::HttpSettingsStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    /// Base URL of the host serving plugin settings.
    pub base_url: String,
    /// Plugin whose tag settings are edited.
    pub plugin_id: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Readiness probe path, relative to `base_url`.
    pub ready_path: String,
    /// Maximum readiness probes before giving up.
    pub ready_max_attempts: u32,
    /// Delay between readiness probes in milliseconds.
    pub ready_interval_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::STORE_URL.to_string(),
            plugin_id: defaults::PLUGIN_ID.to_string(),
            timeout_secs: defaults::STORE_TIMEOUT_SECS,
            ready_path: defaults::READY_PATH.to_string(),
            ready_max_attempts: defaults::READY_MAX_ATTEMPTS,
            ready_interval_ms: defaults::READY_INTERVAL_MS,
        }
    }
}

impl StoreConfig {
    /// Create a configuration for the given base URL with every other value
    /// at its default.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Load from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let base = Self::default();
        Self {
            base_url: lookup(defaults::ENV_BASE_URL).unwrap_or(base.base_url),
            plugin_id: lookup(defaults::ENV_PLUGIN_ID).unwrap_or(base.plugin_id),
            timeout_secs: lookup(defaults::ENV_TIMEOUT_SECS)
                .and_then(|v| v.parse().ok())
                .unwrap_or(base.timeout_secs),
            ready_path: lookup(defaults::ENV_READY_PATH).unwrap_or(base.ready_path),
            ready_max_attempts: lookup(defaults::ENV_READY_MAX_ATTEMPTS)
                .and_then(|v| v.parse().ok())
                .unwrap_or(base.ready_max_attempts),
            ready_interval_ms: lookup(defaults::ENV_READY_INTERVAL_MS)
                .and_then(|v| v.parse().ok())
                .unwrap_or(base.ready_interval_ms),
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(Error::Config("base_url cannot be empty".to_string()));
        }

        // Basic URL validation
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(Error::Config(format!(
                "base_url must start with http:// or https://, got: {}",
                self.base_url
            )));
        }

        if self.plugin_id.trim().is_empty() {
            return Err(Error::Config("plugin_id cannot be empty".to_string()));
        }

        if self.timeout_secs == 0 {
            return Err(Error::Config("timeout_secs must be positive".to_string()));
        }

        if !self.ready_path.starts_with('/') {
            return Err(Error::Config(format!(
                "ready_path must start with '/', got: {}",
                self.ready_path
            )));
        }

        if self.ready_max_attempts == 0 {
            return Err(Error::Config(
                "ready_max_attempts must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn ready_interval(&self) -> Duration {
        Duration::from_millis(self.ready_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config_is_valid() {
        let config = StoreConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.plugin_id, "skier_aitagging");
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_from_lookup_overrides() {
        let vars = HashMap::from([
            ("TAGTUNE_BASE_URL", "https://stash.local:4153"),
            ("TAGTUNE_PLUGIN_ID", "other_plugin"),
            ("TAGTUNE_TIMEOUT_SECS", "5"),
            ("TAGTUNE_READY_MAX_ATTEMPTS", "3"),
        ]);
        let config = StoreConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.base_url, "https://stash.local:4153");
        assert_eq!(config.plugin_id, "other_plugin");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.ready_max_attempts, 3);
        assert_eq!(config.ready_interval_ms, defaults::READY_INTERVAL_MS);
    }

    #[test]
    fn test_from_lookup_ignores_unparsable_numbers() {
        let config = StoreConfig::from_lookup(|k| {
            (k == "TAGTUNE_TIMEOUT_SECS").then(|| "soon".to_string())
        });
        assert_eq!(config.timeout_secs, defaults::STORE_TIMEOUT_SECS);
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let config = StoreConfig::with_base_url("localhost:4153");
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let config = StoreConfig::with_base_url("");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_ready_ceiling() {
        let config = StoreConfig {
            ready_max_attempts: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_plugin() {
        let config = StoreConfig {
            plugin_id: " ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
