//! Wire types exchanged with the settings store.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;
use tracing::trace;

use crate::tags::{normalize_tag_key, TagField};

// =============================================================================
// LENIENT FIELD DECODING
// =============================================================================

/// Decode a flag the way the persisted table writes them.
///
/// Booleans pass through, numbers are true when non-zero, and the usual
/// textual spellings are recognized. Anything else decodes as absent so the
/// caller's default applies.
fn lenient_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = JsonValue::deserialize(deserializer)?;
    Ok(match value {
        JsonValue::Bool(b) => Some(b),
        JsonValue::Number(n) => n.as_f64().map(|f| f != 0.0),
        JsonValue::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            other => {
                trace!(value = other, "Unrecognized flag spelling, using default");
                None
            }
        },
        _ => None,
    })
}

/// Decode a threshold as text; numbers are rendered, null becomes empty.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = JsonValue::deserialize(deserializer)?;
    Ok(match value {
        JsonValue::Null => String::new(),
        JsonValue::String(s) => s,
        JsonValue::Number(n) => n.to_string(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Array(_) | JsonValue::Object(_) => String::new(),
    })
}

/// Treat an explicit `null` like an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// READ RESPONSE
// =============================================================================

/// One row of the tag catalog as returned by the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub enabled: Option<bool>,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub markers_enabled: Option<bool>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub required_scene_tag_duration: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub min_marker_duration: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub max_gap: String,
}

impl CatalogEntry {
    /// Shorthand for an entry with only a name and category.
    pub fn named(tag: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            tag: Some(tag.into()),
            category: Some(category.into()),
            ..Default::default()
        }
    }

    /// Display name, preferring `tag` over `name`; `None` when both are blank.
    pub fn display_name(&self) -> Option<&str> {
        [self.tag.as_deref(), self.name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|n| !n.is_empty())
    }
}

/// Process-wide threshold defaults.
///
/// Used for display placeholders only; never copied into a tag's own fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TagDefaults {
    #[serde(default, deserialize_with = "lenient_text")]
    pub required_scene_tag_duration: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub min_marker_duration: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub max_gap: String,
}

impl TagDefaults {
    /// Default text for a threshold field, `None` for flag fields or blanks.
    pub fn get(&self, field: TagField) -> Option<&str> {
        let value = match field {
            TagField::RequiredSceneTagDuration => &self.required_scene_tag_duration,
            TagField::MinMarkerDuration => &self.min_marker_duration,
            TagField::MaxGap => &self.max_gap,
            TagField::Enabled | TagField::MarkersEnabled => return None,
        };
        if value.trim().is_empty() {
            None
        } else {
            Some(value.as_str())
        }
    }
}

/// A detection model currently served by the tagging backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActiveModel {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub identifier: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub version: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub categories: Vec<String>,
    #[serde(rename = "type", default, deserialize_with = "lenient_text")]
    pub model_type: String,
}

/// Response of the store's catalog read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<CatalogEntry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub defaults: TagDefaults,
    #[serde(default, deserialize_with = "null_as_default")]
    pub models: Vec<ActiveModel>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub loaded_categories: Vec<String>,
    /// Set by the store when it could not read its own table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// =============================================================================
// WRITE DOCUMENT
// =============================================================================

/// Persisted override for one tag. `None` thresholds ship as `null`
/// ("inherit the default").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagOverride {
    pub enabled: bool,
    pub markers_enabled: bool,
    pub required_scene_tag_duration: Option<String>,
    pub min_marker_duration: Option<f64>,
    pub max_gap: Option<f64>,
}

/// Full override set; the store replaces its stored set with this one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WriteBackDocument {
    pub tag_settings: BTreeMap<String, TagOverride>,
}

impl WriteBackDocument {
    pub fn len(&self) -> usize {
        self.tag_settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tag_settings.is_empty()
    }
}

/// Acknowledgment returned by store writes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WriteAck {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub updated: Option<usize>,
}

impl WriteAck {
    pub fn ok(updated: usize) -> Self {
        Self {
            status: Some("ok".to_string()),
            updated: Some(updated),
        }
    }
}

// =============================================================================
// TAG STATUSES
// =============================================================================

/// Response of the store's status read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TagStatuses {
    #[serde(default)]
    pub statuses: BTreeMap<String, bool>,
}

/// Enable/disable update for tags, either as a full map or as name lists.
///
/// When `tag_statuses` is present the lists are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TagStatusUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_statuses: Option<BTreeMap<String, bool>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled_tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled_tags: Option<Vec<String>>,
}

impl TagStatusUpdate {
    pub fn from_statuses(statuses: BTreeMap<String, bool>) -> Self {
        Self {
            tag_statuses: Some(statuses),
            ..Default::default()
        }
    }

    pub fn from_lists(enabled: Vec<String>, disabled: Vec<String>) -> Self {
        Self {
            tag_statuses: None,
            enabled_tags: Some(enabled),
            disabled_tags: Some(disabled),
        }
    }

    /// Merge this update into `current` and return the reported update count.
    ///
    /// A status map counts its own entries; list updates count the whole
    /// resulting map. Disables win over enables for a name in both lists.
    pub fn apply_to(&self, current: &mut BTreeMap<String, bool>) -> usize {
        if let Some(statuses) = &self.tag_statuses {
            for (name, enabled) in statuses {
                current.insert(normalize_tag_key(name), *enabled);
            }
            return statuses.len();
        }

        for name in self.enabled_tags.iter().flatten() {
            current.insert(normalize_tag_key(name), true);
        }
        for name in self.disabled_tags.iter().flatten() {
            current.insert(normalize_tag_key(name), false);
        }
        current.len()
    }
}
