//! Centralized default constants for tagtune.
//!
//! **This module is the single source of truth** for shared default values.
//! Store clients and the editor reference these constants instead of
//! defining their own magic numbers.

// =============================================================================
// SETTINGS STORE
// =============================================================================

/// Default settings store base URL.
pub const STORE_URL: &str = "http://127.0.0.1:4153";

/// Plugin whose tag settings are edited when none is configured.
pub const PLUGIN_ID: &str = "skier_aitagging";

/// Timeout for settings store requests in seconds.
pub const STORE_TIMEOUT_SECS: u64 = 30;

/// Route prefix for per-plugin settings endpoints.
pub const SETTINGS_ROUTE_PREFIX: &str = "/api/v1/plugins/settings";

/// Readiness probe path, relative to the base URL.
pub const READY_PATH: &str = "/ready";

// =============================================================================
// READINESS
// =============================================================================

/// Maximum readiness probes before giving up.
///
/// A permanently absent store must not be polled forever.
pub const READY_MAX_ATTEMPTS: u32 = 50;

/// Delay between readiness probes in milliseconds.
pub const READY_INTERVAL_MS: u64 = 100;

// =============================================================================
// TAG CATALOG
// =============================================================================

/// Category assigned to catalog entries that carry none.
pub const FALLBACK_CATEGORY: &str = "Other";

/// Row name carrying process-wide defaults in the persisted table.
pub const DEFAULTS_ROW: &str = "__default__";

/// Names that are placeholders in the persisted table, never real tags.
pub const RESERVED_TAG_NAMES: &[&str] = &[
    DEFAULTS_ROW,
    "*",
    "default",
    "unused1",
    "unused2",
    "unused3",
    "unused4",
];

// =============================================================================
// ENVIRONMENT VARIABLES
// =============================================================================

/// Env var: settings store base URL.
pub const ENV_BASE_URL: &str = "TAGTUNE_BASE_URL";

/// Env var: plugin identifier.
pub const ENV_PLUGIN_ID: &str = "TAGTUNE_PLUGIN_ID";

/// Env var: request timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "TAGTUNE_TIMEOUT_SECS";

/// Env var: readiness probe path.
pub const ENV_READY_PATH: &str = "TAGTUNE_READY_PATH";

/// Env var: readiness attempt ceiling.
pub const ENV_READY_MAX_ATTEMPTS: &str = "TAGTUNE_READY_MAX_ATTEMPTS";

/// Env var: delay between readiness probes in milliseconds.
pub const ENV_READY_INTERVAL_MS: &str = "TAGTUNE_READY_INTERVAL_MS";
