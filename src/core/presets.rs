use crate::domain::model::{Column, Preset, PresetColumns};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

pub const ALL_PRESET_ID: &str = "all";
pub const DEFAULT_PRESET_ID: &str = "essential";

/// How a preset entry is compared with a column key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetMatch {
    /// Exact key, or the entry's dotted segments appear as a contiguous run
    /// in the column key: `likes` matches `data.likes`, not `data.dislikes`.
    #[default]
    Segment,
    /// Plain substring test: `likes` also matches `data.dislikes`.
    Substring,
}

impl PresetMatch {
    pub fn matches(&self, column_key: &str, preset_key: &str) -> bool {
        if column_key == preset_key {
            return true;
        }
        match self {
            PresetMatch::Substring => column_key.contains(preset_key),
            PresetMatch::Segment => {
                let column: Vec<&str> = column_key.split('.').collect();
                let wanted: Vec<&str> = preset_key.split('.').collect();
                wanted.len() <= column.len()
                    && column.windows(wanted.len()).any(|window| window == wanted.as_slice())
            }
        }
    }
}

fn preset(id: &str, name: &str, description: &str, platform: Option<&str>, keys: &[&str]) -> Preset {
    Preset {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        platform: platform.map(str::to_string),
        columns: PresetColumns::Keys(keys.iter().map(|k| k.to_string()).collect()),
    }
}

/// The static catalog. The `all` preset is added per batch by
/// [`all_columns_preset`].
pub fn builtin_presets() -> Vec<Preset> {
    vec![
        preset(
            DEFAULT_PRESET_ID,
            "Essential",
            "Platform, timestamp, content and author",
            None,
            &["platform", "created_at", "data.text", "data.caption", "data.title", "data.author", "data.url"],
        ),
        preset(
            "engagement",
            "Engagement",
            "Reaction and reach metrics",
            None,
            &["platform", "data.likes", "data.comments", "data.shares", "data.views", "data.reactions"],
        ),
        preset(
            "facebook",
            "Facebook",
            "Posts with reactions and shares",
            Some("facebook"),
            &["created_at", "data.text", "data.reactions", "data.likes", "data.comments", "data.shares", "data.url"],
        ),
        preset(
            "instagram",
            "Instagram",
            "Captions, likes and hashtags",
            Some("instagram"),
            &["created_at", "data.caption", "data.likes", "data.comments", "data.hashtags", "data.url"],
        ),
        preset(
            "tiktok",
            "TikTok",
            "Short videos with reach metrics",
            Some("tiktok"),
            &["created_at", "data.text", "data.author", "data.likes", "data.shares", "data.views", "data.music"],
        ),
        preset(
            "youtube",
            "YouTube",
            "Videos by channel",
            Some("youtube"),
            &["data.title", "data.channel", "data.views", "data.likes", "data.comments", "data.duration", "data.published_at"],
        ),
    ]
}

pub fn all_columns_preset(columns: &[Column]) -> Preset {
    Preset {
        id: ALL_PRESET_ID.to_string(),
        name: "All columns".to_string(),
        description: format!("Every detected field ({} columns)", columns.len()),
        platform: None,
        columns: PresetColumns::Keys(columns.iter().map(|c| c.key.clone()).collect()),
    }
}

/// Recomputes `visible` on every column.
///
/// Without a preset, the `max_default_columns` highest-priority columns are
/// shown. With `force_preset_defaults` (or no previous set) visibility comes
/// straight from the preset; otherwise a column keeps the visibility it had
/// in `previous`, and only new keys take the preset's value.
pub fn resolve(
    all_columns: &[Column],
    preset: Option<&Preset>,
    previous: Option<&[Column]>,
    force_preset_defaults: bool,
    max_default_columns: usize,
    matching: PresetMatch,
) -> Vec<Column> {
    if all_columns.is_empty() {
        return Vec::new();
    }

    let top_keys = match preset {
        Some(_) => HashSet::new(),
        None => top_priority_keys(all_columns, max_default_columns),
    };
    let prior: Option<BTreeMap<&str, bool>> = match previous {
        Some(cols) if !force_preset_defaults => {
            Some(cols.iter().map(|c| (c.key.as_str(), c.visible)).collect())
        }
        _ => None,
    };

    all_columns
        .iter()
        .map(|column| {
            let preset_visible = match preset {
                Some(p) if p.id == ALL_PRESET_ID => true,
                Some(p) => match &p.columns {
                    PresetColumns::All => true,
                    PresetColumns::Keys(keys) => {
                        keys.iter().any(|key| matching.matches(&column.key, key))
                    }
                },
                None => top_keys.contains(column.key.as_str()),
            };

            let visible = prior
                .as_ref()
                .and_then(|prior| prior.get(column.key.as_str()).copied())
                .unwrap_or(preset_visible);

            Column {
                visible,
                ..column.clone()
            }
        })
        .collect()
}

fn top_priority_keys(columns: &[Column], limit: usize) -> HashSet<&str> {
    let mut ranked: Vec<&Column> = columns.iter().collect();
    ranked.sort_by(|a, b| b.priority.cmp(&a.priority));
    ranked
        .into_iter()
        .take(limit)
        .map(|column| column.key.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Formatter, ValueType};
    use std::collections::BTreeSet;

    fn column(key: &str, priority: u32) -> Column {
        Column {
            key: key.to_string(),
            label: key.to_string(),
            priority,
            value_type: ValueType::Text,
            formatter: Formatter::Text,
            contributing_platforms: BTreeSet::new(),
            visible: true,
            width_hint: "300px".to_string(),
            examples: Vec::new(),
        }
    }

    fn columns() -> Vec<Column> {
        vec![
            column("platform", 90),
            column("data.caption", 95),
            column("data.likes", 60),
            column("data.dislikes", 3),
            column("data.author.name", 95),
        ]
    }

    fn visible_keys(columns: &[Column]) -> Vec<&str> {
        columns
            .iter()
            .filter(|c| c.visible)
            .map(|c| c.key.as_str())
            .collect()
    }

    fn keys_preset(keys: &[&str]) -> Preset {
        preset("custom", "Custom", "", None, keys)
    }

    #[test]
    fn test_empty_columns_resolve_to_empty() {
        let p = keys_preset(&["platform"]);
        assert!(resolve(&[], Some(&p), None, true, 5, PresetMatch::Segment).is_empty());
    }

    #[test]
    fn test_all_preset_shows_everything_when_forced() {
        let mut previous = columns();
        for c in previous.iter_mut() {
            c.visible = false;
        }
        let all = all_columns_preset(&previous);

        let resolved = resolve(&columns(), Some(&all), Some(&previous), true, 2, PresetMatch::Segment);
        assert!(resolved.iter().all(|c| c.visible));
    }

    #[test]
    fn test_segment_matching_skips_lookalike_fields() {
        let p = keys_preset(&["likes", "data.author"]);

        let segment = resolve(&columns(), Some(&p), None, false, 5, PresetMatch::Segment);
        assert_eq!(visible_keys(&segment), vec!["data.likes", "data.author.name"]);

        let substring = resolve(&columns(), Some(&p), None, false, 5, PresetMatch::Substring);
        assert_eq!(
            visible_keys(&substring),
            vec!["data.likes", "data.dislikes", "data.author.name"]
        );
    }

    #[test]
    fn test_no_preset_shows_top_priority_columns() {
        let resolved = resolve(&columns(), None, None, false, 2, PresetMatch::Segment);
        assert_eq!(visible_keys(&resolved), vec!["data.caption", "data.author.name"]);
    }

    #[test]
    fn test_previous_visibility_wins_unless_forced() {
        let p = keys_preset(&["platform"]);
        let mut previous = resolve(&columns(), Some(&p), None, true, 5, PresetMatch::Segment);
        previous[2].visible = true; // data.likes toggled on

        let mut refreshed = columns();
        refreshed.push(column("data.shares", 10));

        let kept = resolve(&refreshed, Some(&p), Some(&previous), false, 5, PresetMatch::Segment);
        assert_eq!(visible_keys(&kept), vec!["platform", "data.likes"]);

        let forced = resolve(&refreshed, Some(&p), Some(&previous), true, 5, PresetMatch::Segment);
        assert_eq!(visible_keys(&forced), vec!["platform"]);
    }

    #[test]
    fn test_builtin_catalog_ids_are_unique() {
        let catalog = builtin_presets();
        let ids: HashSet<&str> = catalog.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids.len(), catalog.len());
        assert!(ids.contains(DEFAULT_PRESET_ID));
        assert!(!ids.contains(ALL_PRESET_ID));
    }
}
