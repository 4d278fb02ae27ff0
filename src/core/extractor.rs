use crate::domain::model::{CoordinatePair, Record};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

pub const DEFAULT_LOCATION_FIELDS: [&str; 2] = ["Location", "Coordinates"];

lazy_static! {
    /// Two signed decimals separated by `;` or `,`, e.g. `48.8566, 2.3522`.
    static ref COORDINATE_PAIR: Regex = Regex::new(
        r"(-?[0-9]+(?:\.[0-9]+)?)\s*[;,]\s*(-?[0-9]+(?:\.[0-9]+)?)"
    ).expect("COORDINATE_PAIR regex is valid");
}

/// Pulls a (lat, lng) pair out of free text.
///
/// When the text holds several pairs the last one wins. The values are taken
/// in the order they appear and are not range-checked.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoordinateExtractor;

impl CoordinateExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, text: Option<&str>) -> CoordinatePair {
        let text = match text {
            Some(t) if !t.is_empty() => t,
            _ => return CoordinatePair::absent(),
        };

        let Some(caps) = COORDINATE_PAIR.captures_iter(text).last() else {
            return CoordinatePair::absent();
        };

        match (caps[1].parse::<f64>(), caps[2].parse::<f64>()) {
            (Ok(lat), Ok(lng)) => CoordinatePair::new(lat, lng),
            _ => CoordinatePair::absent(),
        }
    }

    pub fn extract_record(&self, record: &Record, fields: &[String]) -> CoordinatePair {
        self.extract(location_text(record, fields))
    }
}

/// First of `fields` holding a non-empty string. Missing, null, empty and
/// non-string values fall through to the next field.
pub fn location_text<'a>(record: &'a Record, fields: &[String]) -> Option<&'a str> {
    fields.iter().find_map(|field| match record.data.get(field) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.as_str()),
        _ => None,
    })
}

pub fn default_location_fields() -> Vec<String> {
    DEFAULT_LOCATION_FIELDS.iter().map(|f| f.to_string()).collect()
}
