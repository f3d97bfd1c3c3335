//! Ingestion edge for the semantic comparator.
//!
//! The comparator is a generative process and its output is loosely shaped:
//! keys go missing, numbers arrive as strings, the JSON may be wrapped in
//! prose or code fences. Everything is validated into `ChangeCandidate` here
//! with explicit defaults; raw maps never travel further.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::scoring::parse_external_confidence;
use crate::source_kind::SourceKind;
use crate::telemetry;

pub const DEFAULT_FIELD: &str = "unknown indicator";
pub const PLACEHOLDER_VALUE: &str = "N/A";
pub const DEFAULT_STATUS: &str = "changed";
pub const DEFAULT_INSIGHT: &str = "No interpretation was provided for this change.";

const FIELD_KEYS: &[&str] = &["field", "indicator", "name"];
const OLD_KEYS: &[&str] = &["old", "old_value", "before"];
const NEW_KEYS: &[&str] = &["new", "new_value", "value", "after"];
const STATUS_KEYS: &[&str] = &["status"];
const INSIGHT_KEYS: &[&str] = &["insight", "analysis"];
const SOURCE_KEYS: &[&str] = &["source", "source_type"];
const WRAPPER_KEYS: &[&str] = &["changes", "items", "data"];

/// A validated comparator record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeCandidate {
    pub field: String,
    pub old: String,
    pub new: String,
    pub status: String,
    pub insight: String,
    /// External confidence estimate, if the comparator gave a usable number.
    pub confidence: Option<f64>,
    /// Declared source, used only when no evidence item can be found.
    pub source: Option<SourceKind>,
}

impl ChangeCandidate {
    /// Candidate with defaults for everything except the three core values.
    pub fn new(field: impl Into<String>, old: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            old: old.into(),
            new: new.into(),
            status: DEFAULT_STATUS.to_string(),
            insight: DEFAULT_INSIGHT.to_string(),
            confidence: None,
            source: None,
        }
    }

    pub fn with_source(mut self, source: SourceKind) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Validate one JSON value. `None` when it is not an object.
    pub fn from_value(v: &Value) -> Option<Self> {
        let obj = v.as_object()?;
        Some(Self {
            field: text_or(obj, FIELD_KEYS, DEFAULT_FIELD),
            old: text_or(obj, OLD_KEYS, PLACEHOLDER_VALUE),
            new: text_or(obj, NEW_KEYS, PLACEHOLDER_VALUE),
            status: text_or(obj, STATUS_KEYS, DEFAULT_STATUS),
            insight: text_or(obj, INSIGHT_KEYS, DEFAULT_INSIGHT),
            confidence: obj.get("confidence").and_then(parse_external_confidence),
            source: text(obj, SOURCE_KEYS).map(|s| SourceKind::normalize(&s)),
        })
    }
}

/// First usable textual value under any of `keys`. Numbers and booleans are
/// stringified; blank strings count as missing.
fn text(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| match obj.get(*k)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

fn text_or(obj: &Map<String, Value>, keys: &[&str], default: &str) -> String {
    text(obj, keys).unwrap_or_else(|| default.to_string())
}

/// Parse raw comparator output. Never fails: unusable input gives an empty list.
pub fn parse_candidates(raw: &str) -> Vec<ChangeCandidate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let parsed = serde_json::from_str::<Value>(trimmed)
        .ok()
        .or_else(|| embedded_json(trimmed, '[', ']'))
        .or_else(|| embedded_json(trimmed, '{', '}'));

    match parsed {
        Some(v) => candidates_from_value(&v),
        None => {
            warn!(len = trimmed.len(), "comparator output is not JSON, no candidates");
            Vec::new()
        }
    }
}

/// JSON hidden inside prose or a code fence: first `open` to last `close`.
fn embedded_json(s: &str, open: char, close: char) -> Option<Value> {
    let start = s.find(open)?;
    let end = s.rfind(close)?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&s[start..=end]).ok()
}

/// Accepts an array, an object wrapping an array, or a single object.
pub fn candidates_from_value(v: &Value) -> Vec<ChangeCandidate> {
    let elements: Vec<&Value> = match v {
        Value::Array(arr) => arr.iter().collect(),
        Value::Object(obj) => match WRAPPER_KEYS
            .iter()
            .find_map(|k| obj.get(*k).and_then(Value::as_array))
        {
            Some(arr) => arr.iter().collect(),
            None => vec![v],
        },
        _ => {
            warn!("comparator output is neither array nor object");
            return Vec::new();
        }
    };

    let total = elements.len();
    let out: Vec<ChangeCandidate> = elements
        .into_iter()
        .filter_map(ChangeCandidate::from_value)
        .collect();

    let rejected = total - out.len();
    if rejected > 0 {
        warn!(rejected, "skipped non-object comparator entries");
    }
    telemetry::record_rejected_candidates(rejected);
    debug!(accepted = out.len(), "comparator candidates ingested");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_fill_missing_keys() {
        let c = ChangeCandidate::from_value(&json!({})).unwrap();
        assert_eq!(c.field, DEFAULT_FIELD);
        assert_eq!(c.old, PLACEHOLDER_VALUE);
        assert_eq!(c.new, PLACEHOLDER_VALUE);
        assert_eq!(c.status, DEFAULT_STATUS);
        assert_eq!(c.insight, DEFAULT_INSIGHT);
        assert_eq!(c.confidence, None);
        assert_eq!(c.source, None);
    }

    #[test]
    fn garbled_values_are_coerced() {
        let c = ChangeCandidate::from_value(&json!({
            "field": "  ",
            "old": 80,
            "new_value": "92%",
            "status": null,
            "confidence": "very sure",
            "source": "unknown_agency",
            "extra": {"ignored": true}
        }))
        .unwrap();
        assert_eq!(c.field, DEFAULT_FIELD);
        assert_eq!(c.old, "80");
        assert_eq!(c.new, "92%");
        assert_eq!(c.status, DEFAULT_STATUS);
        assert_eq!(c.confidence, None);
        assert_eq!(c.source, Some(SourceKind::Media));
    }

    #[test]
    fn fenced_array_is_found() {
        let raw = "Here you go:\n```json\n[{\"field\":\"产能利用率\",\"old\":\"80%\",\"new\":\"92%\",\"status\":\"increased\",\"confidence\":0.9}]\n```";
        let v = parse_candidates(raw);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].field, "产能利用率");
        assert_eq!(v[0].status, "increased");
        assert_eq!(v[0].confidence, Some(0.9));
    }

    #[test]
    fn wrapper_and_single_object() {
        let v = parse_candidates(r#"{"changes":[{"field":"a"},3,{"field":"b"}]}"#);
        let fields: Vec<&str> = v.iter().map(|c| c.field.as_str()).collect();
        assert_eq!(fields, vec!["a", "b"]);

        let v = parse_candidates(r#"{"field":"solo","new":"1%"}"#);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].new, "1%");
    }

    #[test]
    fn garbage_gives_empty() {
        assert!(parse_candidates("").is_empty());
        assert!(parse_candidates("the model refused").is_empty());
        assert!(parse_candidates("42").is_empty());
        assert!(parse_candidates("[1, 2, \"x\"]").is_empty());
    }
}
