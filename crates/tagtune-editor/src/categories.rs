//! Category grouping, tallies and bulk toggles over the working copy.
//!
//! Every count is recomputed from the working copy on each call.

use serde::Serialize;

use tagtune_core::{category_sort_key, TagSetting};

use crate::session::EditorSession;

/// Tags sharing one category, in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGroup<'a> {
    pub category: &'a str,
    pub tags: Vec<&'a TagSetting>,
}

/// Progress line for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub category: String,
    pub enabled: usize,
    pub total: usize,
    pub fully_enabled: bool,
    /// Whether an active model can produce tags in this category.
    pub loaded: bool,
}

impl EditorSession {
    fn members<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a TagSetting> + 'a {
        self.tags()
            .values()
            .filter(move |t| t.category() == category)
    }

    /// Number of tags in `category`.
    pub fn count_total(&self, category: &str) -> usize {
        self.members(category).count()
    }

    /// Number of enabled tags in `category`.
    pub fn count_enabled(&self, category: &str) -> usize {
        self.members(category).filter(|t| t.enabled).count()
    }

    /// True iff `category` has members and all of them are enabled.
    pub fn is_category_fully_enabled(&self, category: &str) -> bool {
        let mut members = self.members(category).peekable();
        members.peek().is_some() && members.all(|t| t.enabled)
    }

    /// True when no model information was loaded, or an active model covers
    /// `category`.
    pub fn is_category_loaded(&self, category: &str) -> bool {
        let loaded = self.loaded_categories();
        loaded.is_empty()
            || loaded
                .iter()
                .any(|c| c.trim().eq_ignore_ascii_case(category.trim()))
    }

    /// Distinct categories in display order.
    pub fn category_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tags().values().map(TagSetting::category).collect();
        names.sort_by_key(|c| category_sort_key(c));
        names.dedup();
        names
    }

    /// Tags grouped by category; groups in display order, tags by name.
    pub fn categories(&self) -> Vec<CategoryGroup<'_>> {
        self.category_names()
            .into_iter()
            .map(|category| {
                let mut tags: Vec<&TagSetting> = self.members(category).collect();
                tags.sort_by_key(|t| t.tag_name().to_lowercase());
                CategoryGroup { category, tags }
            })
            .collect()
    }

    pub fn category_summaries(&self) -> Vec<CategorySummary> {
        self.category_names()
            .into_iter()
            .map(|category| CategorySummary {
                category: category.to_string(),
                enabled: self.count_enabled(category),
                total: self.count_total(category),
                fully_enabled: self.is_category_fully_enabled(category),
                loaded: self.is_category_loaded(category),
            })
            .collect()
    }

    /// Set `enabled` on every member of `category`; returns the member count.
    pub(crate) fn set_category_enabled(&mut self, category: &str, enabled: bool) -> usize {
        let mut touched = 0;
        for tag in self.tags_mut().filter(|t| t.category() == category) {
            tag.enabled = enabled;
            touched += 1;
        }
        touched
    }

    /// Set `enabled` on every tag; returns the tag count.
    pub(crate) fn set_all_enabled(&mut self, enabled: bool) -> usize {
        let mut touched = 0;
        for tag in self.tags_mut() {
            tag.enabled = enabled;
            touched += 1;
        }
        touched
    }
}
