//! Construction of the write-back document from the working copy.
//!
//! Numeric thresholds are coerced best-effort: text that is not a finite
//! base-10 number ships as `null` (inherit the default) instead of failing
//! the save. The scene duration ships as the literal text.

use std::collections::BTreeMap;

use tagtune_core::{TagField, TagOverride, TagSetting, WriteBackDocument};

/// A threshold that could not be parsed and was sent as `null`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoercedField {
    pub tag_key: String,
    pub field: TagField,
    pub raw: String,
}

/// Result of building a write-back document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteBack {
    pub document: WriteBackDocument,
    pub coerced: Vec<CoercedField>,
}

/// Parse a numeric threshold; `None` for blank or unusable text.
///
/// The whole trimmed text must be a finite number. Partially numeric input
/// such as `"3.5s"` is not truncated to its leading number; it yields `None`
/// and the field inherits the default.
pub fn parse_threshold(raw: &str) -> Option<f64> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Scene duration as shipped: the literal text, or `None` when blank.
pub fn scene_duration_literal(raw: &str) -> Option<String> {
    if raw.trim().is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}

/// Override for one tag, plus the numeric fields that had to be coerced.
pub fn tag_override(key: &str, tag: &TagSetting) -> (TagOverride, Vec<CoercedField>) {
    let mut coerced = Vec::new();
    let mut numeric = |field: TagField, raw: &str| {
        let parsed = parse_threshold(raw);
        if parsed.is_none() && !raw.trim().is_empty() {
            coerced.push(CoercedField {
                tag_key: key.to_string(),
                field,
                raw: raw.to_string(),
            });
        }
        parsed
    };

    let min_marker_duration = numeric(TagField::MinMarkerDuration, &tag.min_marker_duration);
    let max_gap = numeric(TagField::MaxGap, &tag.max_gap);

    let o = TagOverride {
        enabled: tag.enabled,
        markers_enabled: tag.markers_enabled,
        required_scene_tag_duration: scene_duration_literal(&tag.required_scene_tag_duration),
        min_marker_duration,
        max_gap,
    };
    (o, coerced)
}

/// Build the full override set for every tag in the working copy.
pub fn build_write_back(tags: &BTreeMap<String, TagSetting>) -> WriteBack {
    let mut out = WriteBack::default();
    for (key, tag) in tags {
        let (o, coerced) = tag_override(key, tag);
        out.document.tag_settings.insert(key.clone(), o);
        out.coerced.extend(coerced);
    }
    out
}
