use crate::domain::model::{FieldMap, FieldObservation, InferredType, Record};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

pub const DEFAULT_MAX_DEPTH: usize = 3;
pub const MAX_EXAMPLES: usize = 3;
/// Payloads are conventionally wrapped in a `data` object.
pub const ENVELOPE_KEY: &str = "data";
pub const PLATFORM_KEY: &str = "platform";

/// Walks a batch of records and builds one observation per dotted path.
///
/// Nested objects are followed up to `max_depth` levels of keys (top-level
/// keys are level 1); arrays are reported but never descended into. The
/// members of an object-valued `data` field are always reported as
/// `data.<key>`, even when `max_depth` would stop the generic walk before
/// them. A path counts once per record no matter how many passes reach it.
pub fn analyze(records: &[Record], max_depth: usize) -> FieldMap {
    let mut fields = FieldMap::new();
    let mut skipped = 0usize;

    for record in records {
        let Value::Object(object) = record else {
            skipped += 1;
            continue;
        };
        let platform = object.get(PLATFORM_KEY).and_then(Value::as_str);

        let mut seen: BTreeMap<String, &Value> = BTreeMap::new();
        collect_paths(object, "", 1, max_depth, &mut seen);
        if let Some(Value::Object(envelope)) = object.get(ENVELOPE_KEY) {
            for (key, value) in envelope {
                seen.entry(format!("{}.{}", ENVELOPE_KEY, key))
                    .or_insert(value);
            }
        }

        for (path, value) in seen {
            let observation = fields
                .entry(path.clone())
                .or_insert_with(|| FieldObservation::new(path));
            observe(observation, value, platform);
        }
    }

    if skipped > 0 {
        tracing::debug!("Skipped {} records that are not JSON objects", skipped);
    }
    tracing::debug!(
        "Analyzed {} records into {} field paths (max depth {})",
        records.len() - skipped,
        fields.len(),
        max_depth
    );

    fields
}

fn collect_paths<'a>(
    object: &'a Map<String, Value>,
    prefix: &str,
    depth: usize,
    max_depth: usize,
    seen: &mut BTreeMap<String, &'a Value>,
) {
    if depth > max_depth {
        return;
    }

    for (key, value) in object {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        if let Value::Object(nested) = value {
            collect_paths(nested, &path, depth + 1, max_depth, seen);
        }
        seen.entry(path).or_insert(value);
    }
}

fn observe(observation: &mut FieldObservation, value: &Value, platform: Option<&str>) {
    observation.occurrence_count += 1;

    if !value.is_null() {
        if observation.inferred_type == InferredType::Unknown {
            observation.inferred_type = InferredType::of(value);
        }
        if observation.example_values.len() < MAX_EXAMPLES {
            observation.example_values.push(value.clone());
        }
    }

    if let Some(platform) = platform {
        observation.platforms.insert(platform.to_string());
    }
}

/// Distinct string values of the top-level `platform` field.
pub fn observed_platforms(records: &[Record]) -> BTreeSet<String> {
    records
        .iter()
        .filter_map(|record| record.get(PLATFORM_KEY))
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect()
}

/// Resolves a dotted path inside a record.
///
/// An exact key match wins over descending, so top-level keys that contain
/// dots still resolve.
pub fn value_at_path<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    let object = record.as_object()?;
    if let Some(value) = object.get(path) {
        return Some(value);
    }
    let (head, rest) = path.split_once('.')?;
    value_at_path(object.get(head)?, rest)
}
