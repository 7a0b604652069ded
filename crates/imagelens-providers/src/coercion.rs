//! Coercion of free-text model answers into typed records
//!
//! Vision models are asked for a JSON array but do not always comply. Parsing
//! happens in two tiers: a strict JSON parse first, then a text heuristic when
//! the answer is not a JSON list.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::models::{BoundingBox, DetectedObject, ExtractedText};

/// Confidence used when a structured record carries none.
pub const DEFAULT_CONFIDENCE: f64 = 0.8;

/// Confidence assigned to heuristically extracted objects.
pub const HEURISTIC_CONFIDENCE: f64 = 0.7;

/// Upper bound on heuristically extracted objects.
pub const MAX_HEURISTIC_OBJECTS: usize = 10;

const MIN_FRAGMENT_LEN: usize = 3;

static LEAD_IN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(I can see|In this image|The image shows|This image contains)")
        .expect("lead-in pattern is valid")
});

static DELIMITERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[,;.\n]").expect("delimiter pattern is valid"));

static FILLER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(a|an|the|some|several|many|few|and|or)\s+")
        .expect("filler pattern is valid")
});

/// Parse a text-extraction answer.
///
/// A JSON list yields one record per usable element. Anything else becomes a
/// single record holding the whole answer.
pub fn parse_text(response: &str) -> Vec<ExtractedText> {
    match serde_json::from_str::<Value>(response) {
        Ok(Value::Array(items)) => items.iter().filter_map(text_record).collect(),
        _ => {
            let content = response.trim();
            if content.is_empty() {
                Vec::new()
            } else {
                vec![ExtractedText::new(content, DEFAULT_CONFIDENCE)]
            }
        }
    }
}

/// Parse an object-detection answer.
///
/// A JSON list yields one record per usable element; anything else goes
/// through [`heuristic_objects`].
pub fn parse_objects(response: &str) -> Vec<DetectedObject> {
    match serde_json::from_str::<Value>(response) {
        Ok(Value::Array(items)) => items.iter().filter_map(object_record).collect(),
        _ => heuristic_objects(response),
    }
}

/// Pull object names out of prose such as "I can see a dog, a ball, and a tree."
pub fn heuristic_objects(text: &str) -> Vec<DetectedObject> {
    let body = LEAD_IN.replace(text, "");

    DELIMITERS
        .split(&body)
        .map(str::trim)
        .filter(|fragment| fragment.chars().count() >= MIN_FRAGMENT_LEN)
        .map(strip_filler)
        .filter(|name| !name.is_empty())
        .take(MAX_HEURISTIC_OBJECTS)
        .map(|name| DetectedObject::new(name, HEURISTIC_CONFIDENCE))
        .collect()
}

fn strip_filler(mut fragment: &str) -> &str {
    while let Some(found) = FILLER.find(fragment) {
        fragment = fragment[found.end()..].trim_start();
    }
    fragment
}

fn text_record(item: &Value) -> Option<ExtractedText> {
    match item {
        Value::String(content) => Some(ExtractedText::new(content.as_str(), DEFAULT_CONFIDENCE)),
        Value::Object(fields) => {
            let content = fields.get("content")?.as_str()?;
            let mut record = ExtractedText::new(content, confidence(fields.get("confidence")));
            record.bounding_box = bounding_box(fields.get("bounding_box"));
            record.language = fields
                .get("language")
                .and_then(Value::as_str)
                .map(str::to_string);
            Some(record)
        }
        _ => None,
    }
}

fn object_record(item: &Value) -> Option<DetectedObject> {
    match item {
        Value::String(name) => Some(DetectedObject::new(name.as_str(), DEFAULT_CONFIDENCE)),
        Value::Object(fields) => {
            let name = fields.get("name")?.as_str()?;
            let mut record = DetectedObject::new(name, confidence(fields.get("confidence")));
            record.bounding_box = bounding_box(fields.get("bounding_box"));
            record.attributes = fields
                .iter()
                .filter(|(key, _)| !matches!(key.as_str(), "name" | "confidence" | "bounding_box"))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect();
            Some(record)
        }
        _ => None,
    }
}

fn confidence(value: Option<&Value>) -> f64 {
    value
        .and_then(Value::as_f64)
        .filter(|c| c.is_finite())
        .map(|c| c.clamp(0.0, 1.0))
        .unwrap_or(DEFAULT_CONFIDENCE)
}

fn bounding_box(value: Option<&Value>) -> Option<BoundingBox> {
    value.and_then(|v| serde_json::from_value(v.clone()).ok())
}
