//! Advanced per-field validation rules.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::diagnostics::EvaluationWarning;
use crate::spec::field::FieldDefinition;
use crate::spec::rule::{RuleType, ValidationRule};
use crate::value::{
    coerce_string, format_number, is_effectively_empty, parse_float, text_length,
};

pub const REQUIRED_MESSAGE: &str = "This field is required.";
pub const INVALID_FORMAT_MESSAGE: &str = "Invalid format.";
pub const INVALID_PATTERN_MESSAGE: &str =
    "This field has an invalid validation pattern. Please contact the form administrator.";
pub const INVALID_EMAIL_MESSAGE: &str = "Invalid email address.";
pub const INVALID_URL_MESSAGE: &str = "Invalid URL.";
pub const WHOLE_NUMBER_MESSAGE: &str = "Value must be a whole number.";

pub(crate) static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));

/// Outcome of validating one field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldValidation {
    pub is_valid: bool,
    pub error_messages: Vec<String>,
}

impl FieldValidation {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            error_messages: Vec::new(),
        }
    }

    fn from_messages(error_messages: Vec<String>) -> Self {
        Self {
            is_valid: error_messages.is_empty(),
            error_messages,
        }
    }
}

/// Runs the field's active advanced rules against `value`.
///
/// Optional fields with an empty value only fail an explicit `required`
/// rule. Malformed patterns fail the field instead of erroring.
pub fn validate_field(field: &FieldDefinition, value: &Value) -> FieldValidation {
    if field.advanced_validation_rules.is_empty() {
        return FieldValidation::valid();
    }

    let empty = is_effectively_empty(value);
    let mut messages = Vec::new();

    for rule in field
        .advanced_validation_rules
        .iter()
        .filter(|rule| rule.is_active())
    {
        if !field.is_required && empty && rule.kind != RuleType::Required {
            continue;
        }

        match check_rule(rule, value, empty) {
            Ok(None) => {}
            Ok(Some(message)) => messages.push(message),
            Err(warning @ EvaluationWarning::InvalidPattern { .. }) => {
                tracing::warn!(
                    field_id = %field.id,
                    rule_id = %rule.id,
                    %warning,
                    "validation pattern failed to compile"
                );
                messages.push(INVALID_PATTERN_MESSAGE.to_string());
            }
            Err(warning) => {
                tracing::warn!(
                    field_id = %field.id,
                    rule_id = %rule.id,
                    %warning,
                    "validation rule skipped"
                );
            }
        }
    }

    FieldValidation::from_messages(messages)
}

/// Returns the failure message, if any, for a single rule.
fn check_rule(
    rule: &ValidationRule,
    value: &Value,
    empty: bool,
) -> Result<Option<String>, EvaluationWarning> {
    let params = &rule.params;
    let failure = match &rule.kind {
        RuleType::Required => empty.then(|| rule.message_or(|| REQUIRED_MESSAGE.into())),
        RuleType::MinLength => check_length(rule, value, |len, limit| len >= limit, |limit| {
            format!("Must be at least {limit} characters.")
        }),
        RuleType::MaxLength => check_length(rule, value, |len, limit| len <= limit, |limit| {
            format!("Must be no more than {limit} characters.")
        }),
        RuleType::ExactLength => check_length(rule, value, |len, limit| len == limit, |limit| {
            format!("Must be exactly {limit} characters.")
        }),
        RuleType::Pattern => {
            let Value::String(text) = value else {
                return Ok(None);
            };
            let pattern = params.pattern.as_deref().unwrap_or_default();
            let regex = compile_pattern(pattern)?;
            (!regex.is_match(text)).then(|| rule.message_or(|| INVALID_FORMAT_MESSAGE.into()))
        }
        RuleType::MinValue => check_bound(rule, value, |number, limit| number >= limit, |limit| {
            format!("Value must be at least {limit}.")
        }),
        RuleType::MaxValue => check_bound(rule, value, |number, limit| number <= limit, |limit| {
            format!("Value must be no more than {limit}.")
        }),
        RuleType::NumberInteger => {
            let whole = parse_float(value)
                .is_some_and(|number| number.is_finite() && number.fract() == 0.0);
            (!whole).then(|| rule.message_or(|| WHOLE_NUMBER_MESSAGE.into()))
        }
        RuleType::StringContains => {
            let needle = params.value.as_ref().map(coerce_string).unwrap_or_default();
            (!coerce_string(value).contains(&needle))
                .then(|| rule.message_or(|| format!("Must contain \"{needle}\".")))
        }
        RuleType::StringNotContains => {
            let needle = params.value.as_ref().map(coerce_string).unwrap_or_default();
            coerce_string(value)
                .contains(&needle)
                .then(|| rule.message_or(|| format!("Must not contain \"{needle}\".")))
        }
        RuleType::IsEmail => (!is_email(&coerce_string(value)))
            .then(|| rule.message_or(|| INVALID_EMAIL_MESSAGE.into())),
        RuleType::IsUrl => (!is_url(&coerce_string(value)))
            .then(|| rule.message_or(|| INVALID_URL_MESSAGE.into())),
        RuleType::Unknown(name) => {
            return Err(EvaluationWarning::UnsupportedRule(name.clone()));
        }
    };
    Ok(failure)
}

fn check_length(
    rule: &ValidationRule,
    value: &Value,
    accept: fn(f64, f64) -> bool,
    default_message: fn(String) -> String,
) -> Option<String> {
    let len = match value {
        Value::String(text) => text_length(text),
        Value::Array(items) => items.len(),
        _ => return None,
    };
    let limit = rule.params.length_limit()?;
    (!accept(len as f64, limit)).then(|| rule.message_or(|| default_message(format_number(limit))))
}

fn check_bound(
    rule: &ValidationRule,
    value: &Value,
    accept: fn(f64, f64) -> bool,
    default_message: fn(String) -> String,
) -> Option<String> {
    let limit = rule.params.numeric_value();
    let within = match (parse_float(value), limit) {
        (None, _) => false,
        (Some(_), None) => true,
        (Some(number), Some(limit)) => accept(number, limit),
    };
    let shown = limit.map(format_number).unwrap_or_default();
    (!within).then(|| rule.message_or(|| default_message(shown)))
}

pub(crate) fn compile_pattern(pattern: &str) -> Result<Regex, EvaluationWarning> {
    Regex::new(pattern).map_err(|err| EvaluationWarning::InvalidPattern {
        pattern: pattern.to_string(),
        reason: err.to_string(),
    })
}

pub fn is_email(text: &str) -> bool {
    EMAIL.is_match(text)
}

pub fn is_url(text: &str) -> bool {
    Url::parse(text).is_ok()
}
