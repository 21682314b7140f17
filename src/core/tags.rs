use crate::core::analyzer::ENVELOPE_KEY;
use crate::core::synthesizer::title_case;
use crate::domain::model::{Column, QuickFilterTag, ValueType};
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::LazyLock;

const SAMPLE_LIMIT: usize = 60;
const SAMPLE_ARRAY_ITEMS: usize = 2;
const ELLIPSIS: &str = "…";

static CAMEL_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("camel case pattern is valid"));

/// Quick filter tags for the leaf fields inside the `data` envelope, one per
/// column key, sorted by label.
pub fn derive_tags(columns: &[Column]) -> Vec<QuickFilterTag> {
    let prefix = format!("{}.", ENVELOPE_KEY);

    let by_key: BTreeMap<&str, QuickFilterTag> = columns
        .iter()
        .filter(|c| c.key.starts_with(&prefix) && c.value_type != ValueType::Object)
        .map(|c| {
            let tag = QuickFilterTag {
                column_key: c.key.clone(),
                label: tag_label(&c.key),
                path: c.key.clone(),
                visible: c.visible,
                platforms: c.contributing_platforms.clone(),
                sample: c.examples.first().and_then(compact_sample),
            };
            (c.key.as_str(), tag)
        })
        .collect();

    let mut tags: Vec<QuickFilterTag> = by_key.into_values().collect();
    tags.sort_by(|a, b| a.label.cmp(&b.label).then_with(|| a.column_key.cmp(&b.column_key)));
    tags
}

/// `data.author.displayName` becomes `Author / Display Name`.
pub fn tag_label(path: &str) -> String {
    let inner = path
        .strip_prefix(ENVELOPE_KEY)
        .and_then(|rest| rest.strip_prefix('.'))
        .unwrap_or(path);
    inner
        .split('.')
        .map(humanize_segment)
        .collect::<Vec<_>>()
        .join(" / ")
}

fn humanize_segment(segment: &str) -> String {
    let spaced = segment.replace(['_', '-'], " ");
    let spaced = CAMEL_BOUNDARY.replace_all(&spaced, "$1 $2");
    title_case(&spaced)
}

fn compact_sample(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(truncate(s)),
        Value::Array(items) => {
            let shown: Vec<String> = items
                .iter()
                .take(SAMPLE_ARRAY_ITEMS)
                .map(Value::to_string)
                .collect();
            let more = if items.len() > SAMPLE_ARRAY_ITEMS {
                format!(", {}", ELLIPSIS)
            } else {
                String::new()
            };
            Some(format!("[{}{}]", shown.join(", "), more))
        }
        Value::Object(_) => Some(truncate(&value.to_string())),
        Value::Number(_) | Value::Bool(_) => Some(value.to_string()),
    }
}

fn truncate(s: &str) -> String {
    if s.chars().count() > SAMPLE_LIMIT {
        format!("{}{}", s.chars().take(SAMPLE_LIMIT).collect::<String>(), ELLIPSIS)
    } else {
        s.to_string()
    }
}
