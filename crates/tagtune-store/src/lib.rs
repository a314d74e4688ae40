//! # tagtune-store
//!
//! Settings store clients for tagtune.
//!
//! This crate provides:
//! - [`HttpSettingsStore`], a client for the host's plugin settings API
//! - [`StoreConfig`], environment-driven client configuration
//! - [`Readiness`], a bounded wait for the store to come up
//! - An in-memory store for tests (feature `mock`)
//!
//! # Example
//!
//! ```rust,no_run
//! use tagtune_store::{wait_for_store, HttpSettingsStore, Readiness};
//! use tagtune_core::SettingsStore;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = HttpSettingsStore::from_env().unwrap();
//!     let readiness = Readiness::from_config(store.config());
//!     wait_for_store(&store, &readiness).await.unwrap();
//!     let catalog = store.fetch_catalog(&store.config().plugin_id).await.unwrap();
//! }
//! ```

pub mod config;
pub mod error_body;
pub mod http;
pub mod readiness;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use config::StoreConfig;
pub use error_body::error_from_response;
pub use http::HttpSettingsStore;
pub use readiness::{wait_for_store, Readiness};

#[cfg(any(test, feature = "mock"))]
pub use mock::MemorySettingsStore;
