//! # tagtune-core
//!
//! Core types, traits, and abstractions for tagtune.
//!
//! This crate provides the tag settings data model, the wire types exchanged
//! with a settings store, and the [`SettingsStore`] trait that store clients
//! implement.

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod tags;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use tags::*;
pub use traits::*;
