//! Tag settings resolver: load, edit and commit a plugin's tag overrides.

use std::time::Instant;

use tracing::{debug, error, info, instrument, warn};

use tagtune_core::logging::SUBSYSTEM_EDITOR;
use tagtune_core::{
    Error, Result, SceneTagDuration, SettingsStore, TagField, TagFieldEdit, TagSetting,
    TagStatusUpdate, WriteAck,
};

use crate::categories::{CategoryGroup, CategorySummary};
use crate::session::{EditorSession, LoadSummary};
use crate::writeback::{build_write_back, CoercedField, WriteBack};

/// Outcome of a successful commit.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitReport {
    /// Document that was submitted.
    pub submitted: WriteBack,
    /// Store acknowledgment.
    pub ack: WriteAck,
    /// Merge counts of the reload that followed.
    pub reloaded: LoadSummary,
}

impl CommitReport {
    /// Numeric fields sent as `null` because they did not parse.
    pub fn coerced(&self) -> &[CoercedField] {
        &self.submitted.coerced
    }
}

/// Owns one editor session and the store it is persisted to.
///
/// Every operation takes `&mut self`, so a save cannot overlap another save
/// or a load on the same session.
pub struct TagConfigResolver<S: SettingsStore> {
    store: S,
    plugin: String,
    session: EditorSession,
}

impl<S: SettingsStore> TagConfigResolver<S> {
    /// Create a resolver with an empty working copy.
    pub fn new(store: S, plugin: impl Into<String>) -> Result<Self> {
        let plugin = plugin.into();
        if plugin.trim().is_empty() {
            return Err(Error::InvalidInput(
                "plugin identifier cannot be empty".to_string(),
            ));
        }
        Ok(Self {
            store,
            plugin,
            session: EditorSession::new(),
        })
    }

    pub fn plugin(&self) -> &str {
        &self.plugin
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Read-only view of the working copy.
    pub fn session(&self) -> &EditorSession {
        &self.session
    }

    pub fn tag(&self, key: &str) -> Option<&TagSetting> {
        self.session.get(key)
    }

    // -------------------------------------------------------------------------
    // Load
    // -------------------------------------------------------------------------

    /// Replace the working copy with the store's current catalog.
    ///
    /// On failure the working copy and defaults are emptied and a
    /// [`Error::Load`] is returned. No retry is attempted.
    #[instrument(skip(self), fields(subsystem = SUBSYSTEM_EDITOR, component = "resolver", op = "load", plugin = %self.plugin))]
    pub async fn load(&mut self) -> Result<LoadSummary> {
        let start = Instant::now();

        let catalog = match self.store.fetch_catalog(&self.plugin).await {
            Ok(catalog) => catalog,
            Err(e) => {
                self.session.reset();
                error!(error = %e, "Failed to fetch tag catalog");
                return Err(Error::Load(e.user_message()));
            }
        };

        if let Some(msg) = catalog.error.clone() {
            self.session.reset();
            error!(error = %msg, "Settings store reported a catalog error");
            return Err(Error::Load(msg));
        }

        let summary = self.session.replace_from_catalog(catalog);
        info!(
            tag_count = summary.tags,
            collisions = summary.collisions,
            skipped = summary.skipped,
            duration_ms = start.elapsed().as_millis() as u64,
            "Tag settings loaded"
        );
        Ok(summary)
    }

    /// Drop the working copy without saving.
    pub fn discard(&mut self) {
        debug!(plugin = %self.plugin, "Discarding tag settings session");
        self.session.reset();
    }

    // -------------------------------------------------------------------------
    // Edits
    // -------------------------------------------------------------------------

    /// Set one field of one tag. The value is stored unvalidated.
    pub fn set_field(&mut self, key: &str, edit: TagFieldEdit) {
        debug!(tag_key = key, field = %edit.field(), "Editing tag field");
        self.session.set_field(key, edit);
    }

    /// Set one field from its wire name and raw text.
    pub fn set_field_raw(&mut self, key: &str, field: &str, raw: &str) -> Result<()> {
        let field: TagField = field.parse()?;
        let edit = TagFieldEdit::from_raw(field, raw)?;
        self.set_field(key, edit);
        Ok(())
    }

    /// Enable or disable every tag in `category`; returns the member count.
    pub fn set_category_enabled(&mut self, category: &str, enabled: bool) -> usize {
        let touched = self.session.set_category_enabled(category, enabled);
        debug!(category, enabled, tag_count = touched, "Bulk category toggle");
        touched
    }

    /// Enable or disable every tag; returns the tag count.
    pub fn set_all_enabled(&mut self, enabled: bool) -> usize {
        let touched = self.session.set_all_enabled(enabled);
        debug!(enabled, tag_count = touched, "Bulk toggle of all tags");
        touched
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn is_category_fully_enabled(&self, category: &str) -> bool {
        self.session.is_category_fully_enabled(category)
    }

    pub fn count_enabled(&self, category: &str) -> usize {
        self.session.count_enabled(category)
    }

    pub fn count_total(&self, category: &str) -> usize {
        self.session.count_total(category)
    }

    pub fn categories(&self) -> Vec<CategoryGroup<'_>> {
        self.session.categories()
    }

    pub fn category_summaries(&self) -> Vec<CategorySummary> {
        self.session.category_summaries()
    }

    pub fn placeholder(&self, field: TagField) -> Option<&str> {
        self.session.placeholder(field)
    }

    pub fn effective_value(&self, key: &str, field: TagField) -> Option<String> {
        self.session.effective_value(key, field)
    }

    pub fn scene_duration(&self, key: &str) -> Option<SceneTagDuration> {
        self.session.scene_duration(key)
    }

    /// Write-back document for the current working copy, without sending it.
    pub fn preview_write_back(&self) -> WriteBack {
        build_write_back(self.session.tags())
    }

    // -------------------------------------------------------------------------
    // Commit
    // -------------------------------------------------------------------------

    /// Writes replace the whole stored set; only a loaded copy may be written.
    fn ensure_loaded(&self) -> Result<()> {
        if self.session.is_loaded() {
            return Ok(());
        }
        warn!(
            subsystem = SUBSYSTEM_EDITOR,
            component = "resolver",
            plugin = %self.plugin,
            "Refusing to write tag settings that were never loaded"
        );
        Err(Error::Save("no tag settings loaded".to_string()))
    }

    /// Submit the full override set, then reload from the store.
    ///
    /// Fails with [`Error::Save`] without contacting the store when no
    /// catalog is loaded. A rejected write leaves the working copy untouched
    /// and returns [`Error::Save`]. If the write succeeds but the reload fails, the
    /// working copy is emptied and [`Error::Load`] is returned.
    #[instrument(skip(self), fields(subsystem = SUBSYSTEM_EDITOR, component = "resolver", op = "commit", plugin = %self.plugin))]
    pub async fn commit(&mut self) -> Result<CommitReport> {
        self.ensure_loaded()?;
        let start = Instant::now();
        let submitted = build_write_back(self.session.tags());

        for c in &submitted.coerced {
            warn!(
                tag_key = %c.tag_key,
                field = %c.field,
                raw = %c.raw,
                "Unparsable threshold sent as inherit-default"
            );
        }

        let ack = match self
            .store
            .replace_overrides(&self.plugin, &submitted.document)
            .await
        {
            Ok(ack) => ack,
            Err(e) => {
                error!(error = %e, tag_count = submitted.document.len(), "Settings store rejected write");
                return Err(Error::Save(e.user_message()));
            }
        };

        info!(
            tag_count = submitted.document.len(),
            coerced = submitted.coerced.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Tag settings saved"
        );

        let reloaded = self.load().await?;
        Ok(CommitReport {
            submitted,
            ack,
            reloaded,
        })
    }

    /// Push only the enabled flags through the status endpoint, then reload.
    ///
    /// Thresholds and marker flags on the store are left as they are.
    #[instrument(skip(self), fields(subsystem = SUBSYSTEM_EDITOR, component = "resolver", op = "commit_statuses", plugin = %self.plugin))]
    pub async fn commit_statuses(&mut self) -> Result<WriteAck> {
        self.ensure_loaded()?;
        let statuses = self
            .session
            .tags()
            .iter()
            .map(|(key, tag)| (key.clone(), tag.enabled))
            .collect();
        let update = TagStatusUpdate::from_statuses(statuses);

        let ack = self
            .store
            .update_statuses(&self.plugin, &update)
            .await
            .map_err(|e| {
                error!(error = %e, "Settings store rejected status update");
                Error::Save(e.user_message())
            })?;

        self.load().await?;
        Ok(ack)
    }
}
