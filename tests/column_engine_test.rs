use column_lens::core::analyzer::{analyze, DEFAULT_MAX_DEPTH};
use column_lens::core::synthesizer::synthesize;
use column_lens::core::tags::derive_tags;
use column_lens::domain::model::ValueType;
use column_lens::{ColumnEngine, EngineConfig, PresetMatch};
use serde_json::{json, Value};
use std::collections::BTreeSet;

fn two_platform_batch() -> Vec<Value> {
    vec![
        json!({"platform": "facebook", "data": {"likes": 10, "caption": "hi"}}),
        json!({"platform": "tiktok", "data": {"likes": 5}}),
    ]
}

fn scraped_batch() -> Vec<Value> {
    vec![
        json!({
            "platform": "instagram",
            "created_at": "2024-03-01T09:15:00Z",
            "stage": "enriched",
            "data": {
                "caption": "Sunset over the bay",
                "likes": 321,
                "dislikes": 4,
                "likes_ratio": 0.98,
                "hashtags": ["sunset", "bay", "travel"],
                "author": {"name": "Ana", "profileLink": "https://instagram.example/ana"},
                "url": "https://instagram.example/p/abc"
            }
        }),
        json!({
            "platform": "youtube",
            "created_at": "2024-03-02T18:00:00Z",
            "data": {
                "title": "Bay timelapse",
                "views": 12000,
                "likes": 800,
                "channel": "AnaFilms",
                "published_at": "2024-03-02T17:55:00Z"
            }
        }),
        json!(null),
    ]
}

/// The facebook/tiktok scenario end to end: analysis, synthesis and tags.
#[test]
fn test_two_platform_scenario() {
    let records = two_platform_batch();
    let fields = analyze(&records, DEFAULT_MAX_DEPTH);

    let paths: BTreeSet<&str> = fields.keys().map(String::as_str).collect();
    assert_eq!(
        paths,
        BTreeSet::from(["platform", "data", "data.likes", "data.caption"])
    );
    assert_eq!(fields["data.likes"].occurrence_count, 2);
    assert_eq!(fields["data.caption"].occurrence_count, 1);

    let likes = &fields["data.likes"];
    let column = synthesize("data.likes", likes, &likes.platforms);
    assert_eq!(column.value_type, ValueType::Number);
    assert_eq!(
        column.contributing_platforms,
        BTreeSet::from(["facebook".to_string(), "tiktok".to_string()])
    );

    let mut engine = ColumnEngine::new(EngineConfig::default());
    engine.load(&records);
    let tags = engine.tags();
    let tag_keys: Vec<&str> = tags.iter().map(|t| t.column_key.as_str()).collect();
    let tag_labels: Vec<&str> = tags.iter().map(|t| t.label.as_str()).collect();
    assert_eq!(tag_keys, vec!["data.caption", "data.likes"]);
    assert_eq!(tag_labels, vec!["Caption", "Likes"]);
    assert_eq!(derive_tags(engine.columns()), tags);
}

#[test]
fn test_every_path_appears_once_with_record_counts() {
    let records = scraped_batch();
    let fields = analyze(&records, DEFAULT_MAX_DEPTH);

    for (path, observation) in &fields {
        assert_eq!(path, &observation.path);
        let containing = records
            .iter()
            .filter(|r| column_lens::core::analyzer::value_at_path(r, path).is_some())
            .count();
        assert_eq!(observation.occurrence_count, containing, "count for {}", path);
    }
    assert!(fields.contains_key("data.author.profileLink"));
    assert!(!fields.contains_key("data.hashtags.0"));
}

#[test]
fn test_tags_never_include_top_level_columns() {
    let mut engine = ColumnEngine::new(EngineConfig::default());
    engine.load(&scraped_batch());

    let tags = engine.tags();
    assert!(tags.iter().all(|t| t.column_key.starts_with("data.")));
    assert!(tags.iter().all(|t| t.column_key != "platform"));
    assert!(tags.iter().all(|t| t.column_key != "data.author"));

    let link = tags
        .iter()
        .find(|t| t.column_key == "data.author.profileLink")
        .expect("profile link tag");
    assert_eq!(link.label, "Author / Profile Link");

    let hashtags = tags.iter().find(|t| t.column_key == "data.hashtags").unwrap();
    assert_eq!(hashtags.sample.as_deref(), Some(r#"["sunset", "bay", …]"#));

    let mut labels: Vec<&str> = tags.iter().map(|t| t.label.as_str()).collect();
    let sorted = {
        let mut copy = labels.clone();
        copy.sort();
        copy
    };
    assert_eq!(labels, sorted);
    labels.dedup();
    assert_eq!(labels.len(), tags.len());
}

#[test]
fn test_refresh_keeps_toggles_and_preset_switch_drops_them() {
    let config = EngineConfig {
        initial_preset: Some("instagram".to_string()),
        ..EngineConfig::default()
    };
    let mut engine = ColumnEngine::new(config);
    engine.load(&scraped_batch());

    let visible = |engine: &ColumnEngine, key: &str| {
        engine
            .columns()
            .iter()
            .find(|c| c.key == key)
            .map(|c| c.visible)
    };
    assert_eq!(visible(&engine, "data.hashtags"), Some(true));
    assert_eq!(visible(&engine, "data.title"), Some(false));

    engine.toggle_column("data.hashtags");
    engine.toggle_column("data.title");
    engine.load(&scraped_batch());
    assert_eq!(visible(&engine, "data.hashtags"), Some(false));
    assert_eq!(visible(&engine, "data.title"), Some(true));

    engine.select_preset("youtube");
    assert_eq!(visible(&engine, "data.title"), Some(true));
    assert_eq!(visible(&engine, "data.hashtags"), Some(false));

    engine.select_preset("instagram");
    assert_eq!(visible(&engine, "data.hashtags"), Some(true));
    assert_eq!(visible(&engine, "data.title"), Some(false));
}

#[test]
fn test_preset_match_modes_differ_on_lookalike_keys() {
    let records = scraped_batch();

    let mut segment = ColumnEngine::new(EngineConfig::default());
    segment.load(&records);
    segment.select_preset("engagement");
    let dislikes = segment.columns().iter().find(|c| c.key == "data.dislikes").unwrap();
    assert!(!dislikes.visible);

    let ratio = segment.columns().iter().find(|c| c.key == "data.likes_ratio").unwrap();
    assert!(!ratio.visible);

    let mut substring = ColumnEngine::new(EngineConfig {
        preset_match: PresetMatch::Substring,
        ..EngineConfig::default()
    });
    substring.load(&records);
    substring.select_preset("engagement");
    let ratio = substring.columns().iter().find(|c| c.key == "data.likes_ratio").unwrap();
    assert!(ratio.visible);
    let dislikes = substring.columns().iter().find(|c| c.key == "data.dislikes").unwrap();
    assert!(!dislikes.visible);
}

#[test]
fn test_data_arriving_after_fallback_gets_preset_defaults() {
    let config = EngineConfig {
        initial_preset: Some("engagement".to_string()),
        ..EngineConfig::default()
    };
    let mut engine = ColumnEngine::new(config);

    engine.load(&[]);
    assert_eq!(engine.columns().len(), 5);
    assert!(engine.tags().is_empty());

    engine.load(&two_platform_batch());
    let visible: Vec<&str> = engine.visible_columns().iter().map(|c| c.key.as_str()).collect();
    assert_eq!(visible, vec!["platform", "data.likes"]);
}

#[test]
fn test_columns_render_record_values() {
    let mut engine = ColumnEngine::new(EngineConfig::default());
    let records = scraped_batch();
    engine.load(&records);

    let column = |key: &str| {
        engine
            .columns()
            .iter()
            .find(|c| c.key == key)
            .cloned()
            .expect("column exists")
    };

    assert_eq!(column("data.hashtags").render(&records[0]), "3 items");
    assert_eq!(column("created_at").render(&records[1]), "3/2/2024, 6:00:00 PM");
    assert_eq!(column("data.title").render(&records[0]), "N/A");
    assert_eq!(column("data.url").value_type, ValueType::Url);
    assert!(column("data").render(&records[1]).ends_with("..."));
}
