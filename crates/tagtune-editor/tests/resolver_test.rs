//! End-to-end tests for the tag settings resolver against the in-memory store.

use serde_json::json;
use tagtune_core::{CatalogEntry, Error, TagDefaults, TagField, TagFieldEdit};
use tagtune_editor::TagConfigResolver;
use tagtune_store::MemorySettingsStore;

const PLUGIN: &str = "skier_aitagging";

fn entry(name: &str, category: &str, enabled: bool) -> CatalogEntry {
    let mut e = CatalogEntry::named(name, category);
    e.enabled = Some(enabled);
    e
}

async fn loaded(store: MemorySettingsStore) -> TagConfigResolver<MemorySettingsStore> {
    let mut resolver = TagConfigResolver::new(store, PLUGIN).expect("Failed to create resolver");
    resolver.load().await.expect("load failed");
    resolver
}

#[test]
fn test_empty_plugin_is_rejected() {
    let result = TagConfigResolver::new(MemorySettingsStore::new(), "  ");
    assert!(matches!(result, Err(Error::InvalidInput(_))));
}

#[tokio::test]
async fn test_kissing_end_to_end() {
    let store = MemorySettingsStore::new()
        .with_entry(CatalogEntry::named("Kissing", "Sexual Actions"))
        .with_defaults(TagDefaults {
            min_marker_duration: "5".to_string(),
            ..Default::default()
        });
    let mut resolver = loaded(store.clone()).await;

    let tag = resolver.tag("kissing").expect("kissing missing");
    assert_eq!(
        serde_json::to_value(tag).unwrap(),
        json!({
            "tagName": "Kissing",
            "category": "Sexual Actions",
            "enabled": true,
            "markers_enabled": true,
            "required_scene_tag_duration": "",
            "min_marker_duration": "",
            "max_gap": ""
        })
    );

    resolver
        .set_field_raw("kissing", "min_marker_duration", "3.5")
        .unwrap();
    let report = resolver.commit().await.expect("commit failed");

    let expected = json!({
        "tag_settings": {
            "kissing": {
                "enabled": true,
                "markers_enabled": true,
                "required_scene_tag_duration": null,
                "min_marker_duration": 3.5,
                "max_gap": null
            }
        }
    });
    assert_eq!(serde_json::to_value(&report.submitted.document).unwrap(), expected);
    assert_eq!(
        serde_json::to_value(store.last_document().unwrap()).unwrap(),
        expected
    );
    assert!(report.coerced().is_empty());
}

#[tokio::test]
async fn test_zero_edit_round_trip() {
    let mut gag = entry("Gag", "BDSM", false);
    gag.markers_enabled = Some(false);
    gag.max_gap = "4".to_string();
    let store = MemorySettingsStore::new().with_entries([
        CatalogEntry::named("Kissing", "Sexual Actions"),
        gag,
    ]);
    let resolver = loaded(store).await;

    let wb = resolver.preview_write_back();
    let kissing = &wb.document.tag_settings["kissing"];
    assert!(kissing.enabled);
    assert!(kissing.markers_enabled);
    assert_eq!(kissing.required_scene_tag_duration, None);
    assert_eq!(kissing.min_marker_duration, None);
    assert_eq!(kissing.max_gap, None);

    let gag = &wb.document.tag_settings["gag"];
    assert!(!gag.enabled);
    assert!(!gag.markers_enabled);
    assert_eq!(gag.max_gap, Some(4.0));
}

#[tokio::test]
async fn test_case_variant_collision_keeps_later_entry() {
    let mut first = entry("Spanking", "BDSM", false);
    first.min_marker_duration = "7".to_string();
    let mut second = entry("spanking", "BDSM", true);
    second.max_gap = "2".to_string();
    let store = MemorySettingsStore::new().with_entries([first, second]);

    let mut resolver = TagConfigResolver::new(store, PLUGIN).unwrap();
    let summary = resolver.load().await.unwrap();

    assert_eq!(summary.tags, 1);
    assert_eq!(summary.collisions, 1);
    let keys: Vec<&String> = resolver.session().tags().keys().collect();
    assert_eq!(keys, vec!["spanking"]);

    let tag = resolver.tag("spanking").unwrap();
    assert_eq!(tag.tag_name(), "spanking");
    assert!(tag.enabled);
    assert_eq!(tag.min_marker_duration, "");
    assert_eq!(tag.max_gap, "2");
}

#[tokio::test]
async fn test_category_toggle_and_counts() {
    let store = MemorySettingsStore::new().with_entries([
        entry("Rope", "BDSM", false),
        entry("Gag", "BDSM", true),
        entry("Kissing", "Sexual Actions", false),
    ]);
    let mut resolver = loaded(store).await;

    assert!(!resolver.is_category_fully_enabled("BDSM"));
    assert_eq!(resolver.count_enabled("BDSM"), 1);

    assert_eq!(resolver.set_category_enabled("BDSM", true), 2);
    assert!(resolver.is_category_fully_enabled("BDSM"));
    assert_eq!(resolver.count_enabled("BDSM"), 2);
    assert!(!resolver.tag("kissing").unwrap().enabled);

    assert!(!resolver.is_category_fully_enabled("Positions"));
    assert_eq!(resolver.set_category_enabled("Positions", true), 0);
    assert!(!resolver.is_category_fully_enabled("Positions"));

    resolver.set_field("rope", TagFieldEdit::Enabled(false));
    for summary in resolver.category_summaries() {
        assert!(summary.enabled <= summary.total);
        assert_eq!(summary.enabled, resolver.count_enabled(&summary.category));
        assert_eq!(summary.total, resolver.count_total(&summary.category));
    }
}

#[tokio::test]
async fn test_unparsable_threshold_does_not_block_save() {
    let store = MemorySettingsStore::new().with_entries([
        CatalogEntry::named("Kissing", "Sexual Actions"),
        CatalogEntry::named("Rope", "BDSM"),
    ]);
    let mut resolver = loaded(store.clone()).await;

    resolver.set_field("kissing", TagFieldEdit::MinMarkerDuration("abc".to_string()));
    resolver.set_field("kissing", TagFieldEdit::MaxGap("2".to_string()));
    resolver.set_field(
        "kissing",
        TagFieldEdit::RequiredSceneTagDuration("35%".to_string()),
    );
    resolver.set_field("rope", TagFieldEdit::MinMarkerDuration("1.5".to_string()));

    let report = resolver.commit().await.expect("commit failed");
    assert_eq!(report.coerced().len(), 1);
    assert_eq!(report.coerced()[0].tag_key, "kissing");
    assert_eq!(report.coerced()[0].field, TagField::MinMarkerDuration);

    let doc = store.last_document().unwrap();
    let kissing = &doc.tag_settings["kissing"];
    assert_eq!(kissing.min_marker_duration, None);
    assert_eq!(kissing.max_gap, Some(2.0));
    assert_eq!(kissing.required_scene_tag_duration.as_deref(), Some("35%"));
    assert_eq!(doc.tag_settings["rope"].min_marker_duration, Some(1.5));
}

#[tokio::test]
async fn test_save_failure_preserves_working_copy() {
    let store = MemorySettingsStore::new()
        .with_entries([
            CatalogEntry::named("Kissing", "Sexual Actions"),
            entry("Rope", "BDSM", false),
        ])
        .with_write_failure("Failed to write CSV");
    let mut resolver = loaded(store.clone()).await;

    resolver.set_field("kissing", TagFieldEdit::MinMarkerDuration("3.".to_string()));
    resolver.set_category_enabled("BDSM", true);
    let before = resolver.session().clone();

    match resolver.commit().await {
        Err(Error::Save(msg)) => assert_eq!(msg, "Failed to write CSV"),
        other => panic!("Expected Save error, got {:?}", other),
    }

    assert_eq!(resolver.session(), &before);
    assert!(store.documents().is_empty());
    assert_eq!(store.call_count("fetch_catalog"), 1);
}

#[tokio::test]
async fn test_load_failure_resets_session() {
    let store = MemorySettingsStore::new()
        .with_entry(CatalogEntry::named("Kissing", "Sexual Actions"))
        .with_defaults(TagDefaults {
            max_gap: "3".to_string(),
            ..Default::default()
        });
    let mut resolver = loaded(store.clone()).await;
    assert_eq!(resolver.session().len(), 1);

    store.set_read_failure(Some("Settings store unreachable".to_string()));
    match resolver.load().await {
        Err(Error::Load(msg)) => assert_eq!(msg, "Settings store unreachable"),
        other => panic!("Expected Load error, got {:?}", other),
    }

    assert!(resolver.session().is_empty());
    assert_eq!(resolver.placeholder(TagField::MaxGap), None);
    assert_eq!(store.call_count("fetch_catalog"), 2);
}

#[tokio::test]
async fn test_defaults_never_reach_the_store() {
    let store = MemorySettingsStore::new()
        .with_entry(CatalogEntry::named("Kissing", "Sexual Actions"))
        .with_defaults(TagDefaults {
            required_scene_tag_duration: "15".to_string(),
            min_marker_duration: "5".to_string(),
            max_gap: "3".to_string(),
        });
    let mut resolver = loaded(store.clone()).await;

    assert_eq!(
        resolver.effective_value("kissing", TagField::MinMarkerDuration),
        Some("5".to_string())
    );
    assert_eq!(resolver.tag("kissing").unwrap().min_marker_duration, "");

    resolver.commit().await.unwrap();
    let kissing = &store.last_document().unwrap().tag_settings["kissing"];
    assert_eq!(kissing.required_scene_tag_duration, None);
    assert_eq!(kissing.min_marker_duration, None);
    assert_eq!(kissing.max_gap, None);
}

#[tokio::test]
async fn test_commit_reloads_persisted_state() {
    let store = MemorySettingsStore::new().with_entries([
        CatalogEntry::named("Kissing", "Sexual Actions"),
        CatalogEntry::named("Rope", "BDSM"),
    ]);
    let mut resolver = loaded(store.clone()).await;

    resolver.set_field("kissing", TagFieldEdit::MaxGap(" 3 ".to_string()));
    resolver.set_field("rope", TagFieldEdit::MinMarkerDuration("nope".to_string()));
    resolver.set_field("rope", TagFieldEdit::Enabled(false));

    let report = resolver.commit().await.unwrap();
    assert_eq!(report.ack.updated, Some(2));
    assert_eq!(report.reloaded.tags, 2);
    assert_eq!(store.call_count("fetch_catalog"), 2);

    // The reloaded copy shows what the store persisted, not what was typed.
    assert_eq!(resolver.tag("kissing").unwrap().max_gap, "3");
    let rope = resolver.tag("rope").unwrap();
    assert_eq!(rope.min_marker_duration, "");
    assert!(!rope.enabled);
}

#[tokio::test]
async fn test_reload_failure_after_save_reports_load_error() {
    let store = MemorySettingsStore::new().with_entry(CatalogEntry::named("Kissing", "Sexual Actions"));
    let mut resolver = loaded(store.clone()).await;
    resolver.set_field("kissing", TagFieldEdit::Enabled(false));

    store.set_read_failure(Some("offline".to_string()));
    let result = resolver.commit().await;

    assert!(matches!(result, Err(Error::Load(_))));
    assert_eq!(store.documents().len(), 1);
    assert!(resolver.session().is_empty());
}

#[tokio::test]
async fn test_set_field_raw_rejects_unknown_field() {
    let store = MemorySettingsStore::new().with_entry(CatalogEntry::named("Kissing", "Sexual Actions"));
    let mut resolver = loaded(store).await;
    let before = resolver.session().clone();

    assert!(resolver.set_field_raw("kissing", "colour", "red").is_err());
    assert!(resolver.set_field_raw("kissing", "enabled", "maybe").is_err());
    assert_eq!(resolver.session(), &before);

    resolver.set_field_raw("kissing", "enabled", "FALSE").unwrap();
    assert!(!resolver.tag("kissing").unwrap().enabled);
}

#[tokio::test]
async fn test_commit_statuses_pushes_enabled_flags_only() {
    let mut rope = entry("Rope", "BDSM", true);
    rope.max_gap = "4".to_string();
    let store = MemorySettingsStore::new().with_entries([
        rope,
        CatalogEntry::named("Kissing", "Sexual Actions"),
    ]);
    let mut resolver = loaded(store.clone()).await;

    resolver.set_field("rope", TagFieldEdit::Enabled(false));
    resolver.set_field("rope", TagFieldEdit::MaxGap("9".to_string()));

    let ack = resolver.commit_statuses().await.unwrap();
    assert_eq!(ack.updated, Some(2));
    assert!(store.documents().is_empty());

    let rope = resolver.tag("rope").unwrap();
    assert!(!rope.enabled);
    assert_eq!(rope.max_gap, "4");
}

#[tokio::test]
async fn test_discard_empties_session() {
    let store = MemorySettingsStore::new().with_entry(CatalogEntry::named("Kissing", "Sexual Actions"));
    let mut resolver = loaded(store.clone()).await;
    resolver.set_field("kissing", TagFieldEdit::Enabled(false));

    resolver.discard();
    assert!(resolver.session().is_empty());
    assert_eq!(store.call_count("replace_overrides"), 0);

    resolver.load().await.unwrap();
    assert!(resolver.tag("kissing").unwrap().enabled);
}

#[tokio::test]
async fn test_commit_after_failed_load_keeps_store_overrides() {
    let mut rope = entry("Rope", "BDSM", false);
    rope.max_gap = "4".to_string();
    let store = MemorySettingsStore::new().with_entry(rope);
    let mut resolver = loaded(store.clone()).await;

    store.set_read_failure(Some("offline".to_string()));
    assert!(matches!(resolver.load().await, Err(Error::Load(_))));
    store.set_read_failure(None);

    match resolver.commit().await {
        Err(Error::Save(msg)) => assert_eq!(msg, "no tag settings loaded"),
        other => panic!("Expected Save error, got {:?}", other),
    }
    assert!(matches!(
        resolver.commit_statuses().await,
        Err(Error::Save(_))
    ));

    assert!(store.documents().is_empty());
    assert_eq!(store.call_count("replace_overrides"), 0);
    assert_eq!(store.call_count("update_statuses"), 0);
    let rows = store.entries();
    assert_eq!(rows[0].enabled, Some(false));
    assert_eq!(rows[0].max_gap, "4");
}

#[tokio::test]
async fn test_commit_before_load_is_refused() {
    let store = MemorySettingsStore::new().with_entry(CatalogEntry::named("Kissing", "Sexual Actions"));
    let mut resolver = TagConfigResolver::new(store.clone(), PLUGIN).unwrap();
    resolver.set_field("kissing", TagFieldEdit::Enabled(false));

    assert!(matches!(resolver.commit().await, Err(Error::Save(_))));
    assert!(store.calls().is_empty());
    assert!(!resolver.tag("kissing").unwrap().enabled);
}

#[tokio::test]
async fn test_catalog_error_is_load_failure() {
    let store = MemorySettingsStore::new()
        .with_entry(CatalogEntry::named("Kissing", "Sexual Actions"))
        .with_defaults(TagDefaults {
            min_marker_duration: "5".to_string(),
            ..Default::default()
        });
    let mut resolver = loaded(store.clone()).await;
    assert_eq!(resolver.placeholder(TagField::MinMarkerDuration), Some("5"));

    store.set_catalog_error(Some("Failed to read CSV".to_string()));
    match resolver.load().await {
        Err(Error::Load(msg)) => assert_eq!(msg, "Failed to read CSV"),
        other => panic!("Expected Load error, got {:?}", other),
    }

    assert!(resolver.session().is_empty());
    assert!(!resolver.session().is_loaded());
    assert_eq!(resolver.placeholder(TagField::MinMarkerDuration), None);
}

#[tokio::test]
async fn test_scene_duration_for_display() {
    let mut rope = CatalogEntry::named("Rope", "BDSM");
    rope.required_scene_tag_duration = "35%".to_string();
    let store = MemorySettingsStore::new().with_entry(rope);
    let resolver = loaded(store).await;

    let duration = resolver.scene_duration("Rope").unwrap();
    assert_eq!(duration.to_string(), "35%");
    assert!((duration.resolve_secs(200.0) - 70.0).abs() < f64::EPSILON);
}
