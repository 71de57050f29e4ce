//! Value coercions shared by the condition evaluator and the validation
//! engine.
//!
//! Form values arrive from a browser renderer, so these helpers follow the
//! loose conversions that renderer applies: numbers may be numeric strings,
//! strings may be numbers, and a bare calendar date means local midnight.

use std::sync::LazyLock;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use serde_json::{Map, Value};

/// Current values of a form, keyed by field id.
pub type FormValues = Map<String, Value>;

static FLOAT_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").expect("float prefix regex")
});

const NAIVE_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M"];

/// Null, the empty string, or an empty array.
pub fn is_effectively_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Length of a string in UTF-16 code units, the unit browser inputs count
/// `maxlength` in.
pub fn text_length(text: &str) -> usize {
    text.encode_utf16().count()
}

/// String form of a value. Null becomes the empty string and arrays are
/// joined with commas.
pub fn coerce_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                int.to_string()
            } else if let Some(uint) = number.as_u64() {
                uint.to_string()
            } else {
                number.as_f64().map(format_number).unwrap_or_default()
            }
        }
        Value::String(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .map(coerce_string)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Prints a number without a trailing `.0` for whole values.
pub fn format_number(number: f64) -> String {
    if number.is_nan() {
        "NaN".to_string()
    } else if number.is_infinite() {
        let sign = if number < 0.0 { "-" } else { "" };
        format!("{sign}Infinity")
    } else if number == 0.0 {
        "0".to_string()
    } else if number.fract() == 0.0 && number.abs() < 1e21 {
        format!("{number:.0}")
    } else {
        number.to_string()
    }
}

/// Parses the leading numeric part of a value. Booleans, null and values
/// without a numeric prefix yield `None`.
pub fn parse_float(value: &Value) -> Option<f64> {
    match value {
        Value::Null | Value::Bool(_) | Value::Object(_) => None,
        Value::Number(number) => number.as_f64(),
        Value::String(text) => parse_float_str(text),
        Value::Array(_) => parse_float_str(&coerce_string(value)),
    }
}

pub fn parse_float_str(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let unsigned = text
        .strip_prefix('+')
        .or_else(|| text.strip_prefix('-'))
        .unwrap_or(text);
    if unsigned.starts_with("Infinity") {
        return Some(if text.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }
    FLOAT_PREFIX
        .find(text)
        .and_then(|prefix| prefix.as_str().parse::<f64>().ok())
}

/// Parses a string value as a point on the local timeline.
///
/// A bare `YYYY-MM-DD` is local midnight and naive date-times are local, so
/// comparisons between them never depend on the host time zone. Values with
/// an explicit offset are converted into the local zone.
pub fn parse_date(value: &Value) -> Option<NaiveDateTime> {
    let text = value.as_str()?.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Some(instant.with_timezone(&Local).naive_local());
    }

    NAIVE_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
}

/// Parses a bare time of day, placed on the Unix epoch date so that two
/// times compare by clock. Only meaningful for `time` fields.
pub fn parse_clock(value: &Value) -> Option<NaiveDateTime> {
    let text = value.as_str()?.trim();
    let time = TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(text, format).ok())?;
    NaiveDate::from_ymd_opt(1970, 1, 1).map(|epoch| epoch.and_time(time))
}
