//! Editor session state: the working copy of tag settings.
//!
//! The session is owned by exactly one [`crate::TagConfigResolver`]; outside
//! code reads it through shared references and every mutation goes through
//! the resolver.

use std::collections::BTreeMap;

use tracing::{trace, warn};

use tagtune_core::defaults::FALLBACK_CATEGORY;
use tagtune_core::logging::SUBSYSTEM_EDITOR;
use tagtune_core::{
    is_reserved_tag_name, normalize_tag_key, ActiveModel, CatalogResponse, SceneTagDuration,
    TagDefaults, TagField, TagFieldEdit, TagSetting,
};

/// Counts describing how a catalog was merged into the working copy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Tags in the working copy after the load.
    pub tags: usize,
    /// Catalog entries that overwrote an earlier entry with the same key.
    pub collisions: usize,
    /// Catalog entries skipped as blank or reserved.
    pub skipped: usize,
}

/// In-memory working copy plus the context loaded alongside it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditorSession {
    tags: BTreeMap<String, TagSetting>,
    defaults: TagDefaults,
    models: Vec<ActiveModel>,
    loaded_categories: Vec<String>,
    /// Set by a successful catalog merge, cleared by a reset.
    loaded: bool,
}

impl EditorSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Working copy keyed by normalized tag name.
    pub fn tags(&self) -> &BTreeMap<String, TagSetting> {
        &self.tags
    }

    pub fn get(&self, key: &str) -> Option<&TagSetting> {
        self.tags.get(&normalize_tag_key(key))
    }

    pub fn defaults(&self) -> &TagDefaults {
        &self.defaults
    }

    pub fn models(&self) -> &[ActiveModel] {
        &self.models
    }

    pub fn loaded_categories(&self) -> &[String] {
        &self.loaded_categories
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// True once a catalog has been merged and not reset since.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Default text shown as a placeholder for an empty threshold field.
    pub fn placeholder(&self, field: TagField) -> Option<&str> {
        self.defaults.get(field)
    }

    /// Value to display for a tag's threshold: its own value, else the default.
    ///
    /// Display only; the working copy keeps the empty value.
    pub fn effective_value(&self, key: &str, field: TagField) -> Option<String> {
        if !field.is_threshold() {
            return None;
        }
        let own = self
            .get(key)
            .and_then(|t| t.threshold(field))
            .filter(|v| !v.trim().is_empty());
        own.or_else(|| self.placeholder(field)).map(str::to_string)
    }

    /// Effective required scene duration of a tag, parsed.
    ///
    /// `None` when neither the tag nor the defaults set one, or when the text
    /// is not a valid duration.
    pub fn scene_duration(&self, key: &str) -> Option<SceneTagDuration> {
        let raw = self.effective_value(key, TagField::RequiredSceneTagDuration)?;
        SceneTagDuration::parse(&raw).ok().flatten()
    }

    /// Empty the working copy and everything loaded with it.
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }

    /// Replace the whole session with the contents of a catalog response.
    ///
    /// Entries whose names fold to the same key resolve last-write-wins in
    /// catalog order. Thresholds are copied verbatim; defaults stay in their
    /// own record.
    pub(crate) fn replace_from_catalog(&mut self, catalog: CatalogResponse) -> LoadSummary {
        let mut summary = LoadSummary::default();
        let mut tags = BTreeMap::new();

        for entry in catalog.tags {
            let Some(name) = entry.display_name().map(str::to_string) else {
                summary.skipped += 1;
                continue;
            };
            if is_reserved_tag_name(&name) {
                summary.skipped += 1;
                continue;
            }

            let key = normalize_tag_key(&name);
            let category = entry
                .category
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .unwrap_or(FALLBACK_CATEGORY);

            let mut setting = TagSetting::new(name, category);
            setting.enabled = entry.enabled.unwrap_or(true);
            setting.markers_enabled = entry.markers_enabled.unwrap_or(true);
            setting.required_scene_tag_duration = entry.required_scene_tag_duration;
            setting.min_marker_duration = entry.min_marker_duration;
            setting.max_gap = entry.max_gap;

            trace!(tag_key = %key, category = setting.category(), "Merged catalog entry");
            if let Some(previous) = tags.insert(key.clone(), setting) {
                summary.collisions += 1;
                warn!(
                    subsystem = SUBSYSTEM_EDITOR,
                    component = "session",
                    tag_key = %key,
                    overwritten = previous.tag_name(),
                    "Catalog entries share a normalized key; keeping the later one"
                );
            }
        }

        summary.tags = tags.len();
        self.tags = tags;
        self.defaults = catalog.defaults;
        self.models = catalog.models;
        self.loaded_categories = catalog.loaded_categories;
        self.loaded = true;
        summary
    }

    /// Apply one field edit, creating the entry if the key is unknown.
    pub(crate) fn set_field(&mut self, key: &str, edit: TagFieldEdit) {
        let key = normalize_tag_key(key);
        let tag = self.tags.entry(key).or_insert_with_key(|key| {
            warn!(
                subsystem = SUBSYSTEM_EDITOR,
                component = "session",
                tag_key = %key,
                "Editing a tag absent from the loaded catalog"
            );
            TagSetting::new(key.clone(), FALLBACK_CATEGORY)
        });
        tag.apply(edit);
    }

    /// Mutable iteration over every tag, for bulk edits.
    pub(crate) fn tags_mut(&mut self) -> impl Iterator<Item = &mut TagSetting> {
        self.tags.values_mut()
    }
}
