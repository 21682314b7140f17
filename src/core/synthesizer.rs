use crate::core::analyzer::ENVELOPE_KEY;
use crate::domain::model::{Column, FieldObservation, Formatter, InferredType, ValueType};
use std::collections::BTreeSet;

/// Ceiling for the frequency-based fallback priority.
pub const FREQUENCY_PRIORITY_CAP: u32 = 50;

// Fields that matter to the people reading the table, keyed by full
// lowercased path. Anything else is ranked by how often it shows up.
const PRIORITY_TABLE: &[(&str, u32)] = &[
    // content
    ("data.text", 100),
    ("data.caption", 95),
    ("data.title", 90),
    ("data.description", 85),
    ("data.content", 80),
    ("data.message", 75),
    ("data.body", 70),
    ("text", 100),
    ("caption", 95),
    ("title", 90),
    ("description", 85),
    ("content", 80),
    // author / identity
    ("data.author", 95),
    ("data.author.name", 95),
    ("data.username", 90),
    ("data.author.username", 90),
    ("data.channel", 85),
    ("data.owner", 85),
    ("author", 95),
    ("username", 90),
    // engagement
    ("data.likes", 60),
    ("data.shares", 60),
    ("data.comments", 60),
    ("data.views", 60),
    ("data.reactions", 60),
    ("likes", 60),
    ("shares", 60),
    ("comments", 60),
    ("views", 60),
    // metadata
    ("platform", 90),
    ("created_at", 80),
    ("data.published_at", 75),
    ("data.url", 70),
    ("url", 70),
    ("content_type", 55),
    ("id", 50),
    ("stage", 45),
    ("data", 40),
];

/// Builds the display column for one analyzed field.
///
/// The result depends only on the arguments.
pub fn synthesize(
    path: &str,
    observation: &FieldObservation,
    contributing_platforms: &BTreeSet<String>,
) -> Column {
    let value_type = classify(path, observation.inferred_type);

    Column {
        key: path.to_string(),
        label: column_label(path),
        priority: priority_for(path, observation.occurrence_count),
        value_type,
        formatter: formatter_for(path, value_type),
        contributing_platforms: contributing_platforms.clone(),
        visible: true,
        width_hint: value_type.width_hint().to_string(),
        examples: observation.example_values.clone(),
    }
}

/// Path heuristics win over the structural type, in this order: url, date, number.
pub fn classify(path: &str, structural: InferredType) -> ValueType {
    let lowered = path.to_lowercase();
    let has_any = |needles: &[&str]| needles.iter().any(|n| lowered.contains(n));

    if has_any(&["url", "link"]) {
        ValueType::Url
    } else if has_any(&["date", "published", "created"]) {
        ValueType::Date
    } else if has_any(&["count", "likes", "shares"]) {
        ValueType::Number
    } else {
        match structural {
            InferredType::Array => ValueType::Array,
            InferredType::Object => ValueType::Object,
            _ => ValueType::Text,
        }
    }
}

pub fn formatter_for(path: &str, value_type: ValueType) -> Formatter {
    let field_name = path.rsplit('.').next().unwrap_or(path);
    if field_name == ENVELOPE_KEY {
        return Formatter::JsonPreview;
    }

    match value_type {
        ValueType::Date => Formatter::Date,
        ValueType::Url => Formatter::Url,
        ValueType::Array => Formatter::ItemCount,
        ValueType::Object => Formatter::JsonPreview,
        ValueType::Text | ValueType::Number => Formatter::Text,
    }
}

pub fn priority_for(path: &str, occurrence_count: usize) -> u32 {
    let lowered = path.to_lowercase();
    PRIORITY_TABLE
        .iter()
        .find(|(key, _)| *key == lowered)
        .map(|(_, priority)| *priority)
        .unwrap_or_else(|| {
            u32::try_from(occurrence_count)
                .unwrap_or(u32::MAX)
                .min(FREQUENCY_PRIORITY_CAP)
        })
}

/// `data.author.display_name` becomes `Author > Display Name`.
pub fn column_label(path: &str) -> String {
    let mut segments: Vec<&str> = path.split('.').collect();
    if segments.len() > 1 && segments[0] == ENVELOPE_KEY {
        segments.remove(0);
    }

    segments
        .iter()
        .map(|segment| title_case(&segment.replace('_', " ")))
        .collect::<Vec<_>>()
        .join(" > ")
}

pub(crate) fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
