//! # tagtune-editor
//!
//! Tag settings resolution for tagtune.
//!
//! A [`TagConfigResolver`] loads a plugin's tag catalog from a
//! [`tagtune_core::SettingsStore`] into an in-memory working copy, accepts
//! single-field and per-category edits, and commits the full override set
//! back to the store.
//!
//! ```rust,no_run
//! use tagtune_core::TagFieldEdit;
//! use tagtune_editor::TagConfigResolver;
//! use tagtune_store::HttpSettingsStore;
//!
//! # async fn example() -> tagtune_core::Result<()> {
//! let store = HttpSettingsStore::from_env()?;
//! let mut resolver = TagConfigResolver::new(store, "skier_aitagging")?;
//! resolver.load().await?;
//!
//! resolver.set_field("Kissing", TagFieldEdit::MinMarkerDuration("3.5".into()));
//! resolver.set_category_enabled("BDSM", true);
//!
//! let report = resolver.commit().await?;
//! println!("saved {} tags", report.submitted.document.len());
//! # Ok(())
//! # }
//! ```

pub mod categories;
pub mod resolver;
pub mod session;
pub mod writeback;

pub use categories::{CategoryGroup, CategorySummary};
pub use resolver::{CommitReport, TagConfigResolver};
pub use session::{EditorSession, LoadSummary};
pub use writeback::{build_write_back, parse_threshold, CoercedField, WriteBack};
