use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// One input document. Only JSON objects are analyzed.
pub type Record = Value;

/// Structural type of a field, as observed in the raw records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InferredType {
    String,
    Number,
    Boolean,
    Object,
    Array,
    Unknown,
}

impl InferredType {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::String(_) => InferredType::String,
            Value::Number(_) => InferredType::Number,
            Value::Bool(_) => InferredType::Boolean,
            Value::Object(_) => InferredType::Object,
            Value::Array(_) => InferredType::Array,
            Value::Null => InferredType::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldObservation {
    pub path: String,
    pub occurrence_count: usize,
    pub inferred_type: InferredType,
    pub example_values: Vec<Value>,
    /// `platform` values of the records that contain this path.
    pub platforms: BTreeSet<String>,
}

impl FieldObservation {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            occurrence_count: 0,
            inferred_type: InferredType::Unknown,
            example_values: Vec::new(),
            platforms: BTreeSet::new(),
        }
    }
}

pub type FieldMap = BTreeMap<String, FieldObservation>;

/// Display type of a column, derived from path heuristics first and the
/// structural type second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Text,
    Date,
    Url,
    Number,
    Array,
    Object,
}

impl ValueType {
    pub fn width_hint(&self) -> &'static str {
        match self {
            ValueType::Text => "300px",
            ValueType::Date => "150px",
            _ => "120px",
        }
    }
}

/// Pure value -> display string conversions. See `core::formatter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Formatter {
    Text,
    Date,
    Url,
    ItemCount,
    JsonPreview,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub key: String,
    pub label: String,
    pub priority: u32,
    pub value_type: ValueType,
    pub formatter: Formatter,
    pub contributing_platforms: BTreeSet<String>,
    pub visible: bool,
    pub width_hint: String,
    pub examples: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PresetColumns {
    All,
    Keys(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Preset {
    pub id: String,
    pub name: String,
    pub description: String,
    pub platform: Option<String>,
    pub columns: PresetColumns,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuickFilterTag {
    pub column_key: String,
    pub label: String,
    pub path: String,
    pub visible: bool,
    pub platforms: BTreeSet<String>,
    pub sample: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub record_count: usize,
    pub selected_preset: Option<String>,
    pub columns: Vec<Column>,
    pub tags: Vec<QuickFilterTag>,
    pub csv_output: String,
    pub report_json: String,
}
