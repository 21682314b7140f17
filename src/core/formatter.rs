use crate::core::analyzer::value_at_path;
use crate::domain::model::{Column, Formatter, Record};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

pub const NOT_AVAILABLE: &str = "N/A";
const TEXT_LIMIT: usize = 100;
const PREVIEW_LIMIT: usize = 50;
const PREVIEW_KEEP: usize = 47;
/// Epoch numbers at or above this are taken as milliseconds.
const EPOCH_MILLIS_THRESHOLD: f64 = 1e11;

impl Formatter {
    pub fn format(&self, value: Option<&Value>) -> String {
        let value = match value {
            None | Some(Value::Null) => return NOT_AVAILABLE.to_string(),
            Some(value) => value,
        };

        match self {
            Formatter::Text => format_text(value),
            Formatter::Date => format_date(value),
            Formatter::Url => match value {
                Value::String(s) if s.is_empty() => NOT_AVAILABLE.to_string(),
                Value::String(s) => truncate_preview(s),
                other => truncate_preview(&other.to_string()),
            },
            Formatter::ItemCount => match value {
                Value::Array(items) => format!("{} items", items.len()),
                other => format_text(other),
            },
            Formatter::JsonPreview => truncate_preview(&value.to_string()),
        }
    }
}

impl Column {
    /// Looks the column's key up in `record` and formats whatever is there.
    pub fn render(&self, record: &Record) -> String {
        self.formatter.format(value_at_path(record, &self.key))
    }
}

fn format_text(value: &Value) -> String {
    match value {
        Value::String(s) if s.chars().count() > TEXT_LIMIT => {
            format!("{}...", s.chars().take(TEXT_LIMIT).collect::<String>())
        }
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn format_date(value: &Value) -> String {
    let parsed = match value {
        Value::String(s) if s.trim().is_empty() => return NOT_AVAILABLE.to_string(),
        Value::String(s) => parse_date(s.trim()),
        Value::Number(n) => n.as_f64().and_then(from_epoch),
        _ => None,
    };

    match parsed {
        Some(dt) => dt.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string(),
        None => format_text(value),
    }
}

fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, pattern) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    s.parse::<f64>().ok().and_then(from_epoch)
}

fn from_epoch(n: f64) -> Option<DateTime<Utc>> {
    if !n.is_finite() {
        return None;
    }
    if n.abs() >= EPOCH_MILLIS_THRESHOLD {
        DateTime::from_timestamp_millis(n as i64)
    } else {
        DateTime::from_timestamp(n as i64, 0)
    }
}

fn truncate_preview(s: &str) -> String {
    if s.chars().count() > PREVIEW_LIMIT {
        format!("{}...", s.chars().take(PREVIEW_KEEP).collect::<String>())
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_values_render_not_available() {
        for formatter in [
            Formatter::Text,
            Formatter::Date,
            Formatter::Url,
            Formatter::ItemCount,
            Formatter::JsonPreview,
        ] {
            assert_eq!(formatter.format(None), NOT_AVAILABLE);
            assert_eq!(formatter.format(Some(&Value::Null)), NOT_AVAILABLE);
        }
    }

    #[test]
    fn test_date_formats_rfc3339_and_epochs() {
        let iso = json!("2024-01-15T10:30:00Z");
        assert_eq!(Formatter::Date.format(Some(&iso)), "1/15/2024, 10:30:00 AM");

        let seconds = json!(1705314600);
        assert_eq!(Formatter::Date.format(Some(&seconds)), "1/15/2024, 10:30:00 AM");

        let millis = json!(1705314600000i64);
        assert_eq!(Formatter::Date.format(Some(&millis)), "1/15/2024, 10:30:00 AM");

        assert_eq!(Formatter::Date.format(Some(&json!(""))), NOT_AVAILABLE);
        assert_eq!(Formatter::Date.format(Some(&json!("yesterday"))), "yesterday");
    }

    #[test]
    fn test_url_is_truncated_past_fifty_chars() {
        let short = json!("https://example.com/p/1");
        assert_eq!(Formatter::Url.format(Some(&short)), "https://example.com/p/1");

        let long = json!(format!("https://example.com/{}", "a".repeat(60)));
        let rendered = Formatter::Url.format(Some(&long));
        assert_eq!(rendered.chars().count(), 50);
        assert!(rendered.ends_with("..."));
        assert_eq!(Formatter::Url.format(Some(&json!(""))), NOT_AVAILABLE);
    }

    #[test]
    fn test_item_count_and_json_preview() {
        assert_eq!(Formatter::ItemCount.format(Some(&json!([1, 2, 3]))), "3 items");
        assert_eq!(Formatter::ItemCount.format(Some(&json!([]))), "0 items");

        let small = json!({"a": 1});
        assert_eq!(Formatter::JsonPreview.format(Some(&small)), r#"{"a":1}"#);

        let big = json!({"text": "x".repeat(80)});
        let rendered = Formatter::JsonPreview.format(Some(&big));
        assert_eq!(rendered.chars().count(), 50);
        assert!(rendered.starts_with(r#"{"text":"#));
    }

    #[test]
    fn test_text_coerces_and_truncates() {
        assert_eq!(Formatter::Text.format(Some(&json!(42))), "42");
        assert_eq!(Formatter::Text.format(Some(&json!(true))), "true");
        assert_eq!(Formatter::Text.format(Some(&json!("hé"))), "hé");

        let long = json!("é".repeat(150));
        let rendered = Formatter::Text.format(Some(&long));
        assert_eq!(rendered.chars().count(), 103);
    }
}
