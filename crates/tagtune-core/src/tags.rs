//! Tag identity, categories and per-tag settings.
//!
//! A tag is identified by its display name; the case-folded form of that name
//! is the canonical lookup key. Two names that fold to the same key are the
//! same tag.

use serde::{Deserialize, Serialize};

use crate::defaults::{FALLBACK_CATEGORY, RESERVED_TAG_NAMES};
use crate::error::{Error, Result};

// =============================================================================
// IDENTITY
// =============================================================================

/// Normalize a tag name into its canonical lookup key.
///
/// Idempotent: normalizing a key returns the same key.
pub fn normalize_tag_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// True for placeholder rows of the persisted table that are not tags.
pub fn is_reserved_tag_name(name: &str) -> bool {
    let key = normalize_tag_key(name);
    key.is_empty() || RESERVED_TAG_NAMES.contains(&key.as_str())
}

// =============================================================================
// CATEGORIES
// =============================================================================

/// The fixed set of categories the editor knows how to order.
///
/// Catalog categories outside this set are kept verbatim on each tag; they
/// only share the [`TagCategory::Other`] slot when ordering groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TagCategory {
    SexualActions,
    BodyParts,
    Bdsm,
    Positions,
    Other,
}

impl TagCategory {
    /// Display order of the known categories.
    pub const ORDER: [TagCategory; 5] = [
        TagCategory::SexualActions,
        TagCategory::BodyParts,
        TagCategory::Bdsm,
        TagCategory::Positions,
        TagCategory::Other,
    ];

    /// Label as it appears in the catalog.
    pub fn label(&self) -> &'static str {
        match self {
            Self::SexualActions => "Sexual Actions",
            Self::BodyParts => "Body Parts",
            Self::Bdsm => "BDSM",
            Self::Positions => "Positions",
            Self::Other => FALLBACK_CATEGORY,
        }
    }

    /// Match a catalog label (case-insensitive) to a known category.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ORDER
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(label))
    }

    /// Ordering bucket for any catalog label; unknown labels sort with `Other`.
    pub fn bucket(label: &str) -> Self {
        Self::from_label(label).unwrap_or(Self::Other)
    }

    /// Position of this category in [`TagCategory::ORDER`].
    pub fn rank(&self) -> usize {
        Self::ORDER
            .iter()
            .position(|c| c == self)
            .unwrap_or(Self::ORDER.len())
    }
}

impl std::fmt::Display for TagCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Sort key for category labels: fixed order first, then label.
pub fn category_sort_key(label: &str) -> (usize, String) {
    (TagCategory::bucket(label).rank(), label.to_string())
}

// =============================================================================
// FIELDS
// =============================================================================

/// Editable fields of a [`TagSetting`].
///
/// The display name and category are fixed for the session and have no
/// variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagField {
    Enabled,
    MarkersEnabled,
    RequiredSceneTagDuration,
    MinMarkerDuration,
    MaxGap,
}

impl TagField {
    /// Threshold fields, which inherit from the defaults record when empty.
    pub const THRESHOLDS: [TagField; 3] = [
        TagField::RequiredSceneTagDuration,
        TagField::MinMarkerDuration,
        TagField::MaxGap,
    ];

    pub fn is_threshold(&self) -> bool {
        Self::THRESHOLDS.contains(self)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enabled => "enabled",
            Self::MarkersEnabled => "markers_enabled",
            Self::RequiredSceneTagDuration => "required_scene_tag_duration",
            Self::MinMarkerDuration => "min_marker_duration",
            Self::MaxGap => "max_gap",
        }
    }
}

impl std::fmt::Display for TagField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TagField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "enabled" => Ok(Self::Enabled),
            "markers_enabled" => Ok(Self::MarkersEnabled),
            "required_scene_tag_duration" => Ok(Self::RequiredSceneTagDuration),
            "min_marker_duration" => Ok(Self::MinMarkerDuration),
            "max_gap" => Ok(Self::MaxGap),
            other => Err(Error::InvalidInput(format!("Unknown tag field: {}", other))),
        }
    }
}

/// A single-field edit, carrying the raw value the operator entered.
///
/// Threshold values are kept as typed, partially-typed numbers included;
/// they are only interpreted when a write-back document is built.
#[derive(Debug, Clone, PartialEq)]
pub enum TagFieldEdit {
    Enabled(bool),
    MarkersEnabled(bool),
    RequiredSceneTagDuration(String),
    MinMarkerDuration(String),
    MaxGap(String),
}

impl TagFieldEdit {
    /// Build an edit from a field and its raw textual value.
    ///
    /// Flag fields accept `true`/`false` (any case); threshold fields take the
    /// text unchanged.
    pub fn from_raw(field: TagField, raw: &str) -> Result<Self> {
        let flag = || match raw.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(Error::InvalidInput(format!(
                "{} expects true or false, got {:?}",
                field, raw
            ))),
        };
        Ok(match field {
            TagField::Enabled => Self::Enabled(flag()?),
            TagField::MarkersEnabled => Self::MarkersEnabled(flag()?),
            TagField::RequiredSceneTagDuration => Self::RequiredSceneTagDuration(raw.to_string()),
            TagField::MinMarkerDuration => Self::MinMarkerDuration(raw.to_string()),
            TagField::MaxGap => Self::MaxGap(raw.to_string()),
        })
    }

    pub fn field(&self) -> TagField {
        match self {
            Self::Enabled(_) => TagField::Enabled,
            Self::MarkersEnabled(_) => TagField::MarkersEnabled,
            Self::RequiredSceneTagDuration(_) => TagField::RequiredSceneTagDuration,
            Self::MinMarkerDuration(_) => TagField::MinMarkerDuration,
            Self::MaxGap(_) => TagField::MaxGap,
        }
    }
}

// =============================================================================
// TAG SETTING
// =============================================================================

/// Working-copy settings for one tag.
///
/// Threshold fields hold raw text; an empty string means "inherit the
/// default". Defaults are never written into these fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagSetting {
    #[serde(rename = "tagName")]
    tag_name: String,
    category: String,
    pub enabled: bool,
    pub markers_enabled: bool,
    pub required_scene_tag_duration: String,
    pub min_marker_duration: String,
    pub max_gap: String,
}

impl TagSetting {
    /// Create a setting with both flags on and every threshold inherited.
    pub fn new(tag_name: impl Into<String>, category: impl Into<String>) -> Self {
        let category = category.into();
        let category = if category.trim().is_empty() {
            FALLBACK_CATEGORY.to_string()
        } else {
            category
        };
        Self {
            tag_name: tag_name.into(),
            category,
            enabled: true,
            markers_enabled: true,
            required_scene_tag_duration: String::new(),
            min_marker_duration: String::new(),
            max_gap: String::new(),
        }
    }

    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// Canonical key of this tag.
    pub fn key(&self) -> String {
        normalize_tag_key(&self.tag_name)
    }

    /// Apply a single-field edit without validation.
    pub fn apply(&mut self, edit: TagFieldEdit) {
        match edit {
            TagFieldEdit::Enabled(v) => self.enabled = v,
            TagFieldEdit::MarkersEnabled(v) => self.markers_enabled = v,
            TagFieldEdit::RequiredSceneTagDuration(v) => self.required_scene_tag_duration = v,
            TagFieldEdit::MinMarkerDuration(v) => self.min_marker_duration = v,
            TagFieldEdit::MaxGap(v) => self.max_gap = v,
        }
    }

    /// Raw text of a threshold field, `None` for flag fields.
    pub fn threshold(&self, field: TagField) -> Option<&str> {
        match field {
            TagField::RequiredSceneTagDuration => Some(&self.required_scene_tag_duration),
            TagField::MinMarkerDuration => Some(&self.min_marker_duration),
            TagField::MaxGap => Some(&self.max_gap),
            TagField::Enabled | TagField::MarkersEnabled => None,
        }
    }
}

// =============================================================================
// SCENE TAG DURATION
// =============================================================================

/// Unit of a required scene tag duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    /// Absolute seconds.
    Seconds,
    /// Fraction of the scene length, in percent.
    Percent,
}

/// Parsed form of `required_scene_tag_duration`: `"15"`, `"15s"` or `"35%"`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneTagDuration {
    pub value: f64,
    pub unit: DurationUnit,
}

impl SceneTagDuration {
    /// Parse the textual form; empty input yields `Ok(None)`.
    pub fn parse(raw: &str) -> Result<Option<Self>> {
        let text = raw.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let (number, unit) = if let Some(n) = text.strip_suffix('%') {
            (n, DurationUnit::Percent)
        } else if let Some(n) = text.strip_suffix(['s', 'S']) {
            (n, DurationUnit::Seconds)
        } else {
            (text, DurationUnit::Seconds)
        };

        let value: f64 = number.trim().parse().map_err(|_| {
            Error::InvalidInput(format!("Invalid scene tag duration: {:?}", raw))
        })?;
        if !value.is_finite() || value < 0.0 {
            return Err(Error::InvalidInput(format!(
                "Scene tag duration must be a non-negative number: {:?}",
                raw
            )));
        }

        Ok(Some(Self { value, unit }))
    }

    /// Duration in seconds for a scene of the given length.
    pub fn resolve_secs(&self, scene_length_secs: f64) -> f64 {
        match self.unit {
            DurationUnit::Seconds => self.value,
            DurationUnit::Percent => scene_length_secs * self.value / 100.0,
        }
    }
}

impl std::fmt::Display for SceneTagDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.unit {
            DurationUnit::Seconds => write!(f, "{}", self.value),
            DurationUnit::Percent => write!(f, "{}%", self.value),
        }
    }
}
