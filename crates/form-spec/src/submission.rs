//! Submit-time checks across a whole form.
//!
//! This mirrors what the submission endpoint enforces before a response is
//! stored: visibility first, then required-ness, then the type and range
//! constraints carried by the field definition, then the advanced rules.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::spec::field::{FieldDefinition, FieldType};
use crate::spec::form::FormDefinition;
use crate::validate::{
    INVALID_EMAIL_MESSAGE, INVALID_URL_MESSAGE, REQUIRED_MESSAGE, is_email, is_url,
    validate_field,
};
use crate::value::{
    FormValues, coerce_string, format_number, is_effectively_empty, parse_float, text_length,
};
use crate::visibility::{VisibilityMap, resolve_visibility};

pub const NOT_A_NUMBER_MESSAGE: &str = "Value must be a number.";
pub const INVALID_OPTION_MESSAGE: &str = "Please select a valid option.";

/// Messages collected for one visible field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field_id: String,
    pub path: String,
    pub messages: Vec<String>,
}

/// Aggregated submit-time result for a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionReport {
    pub valid: bool,
    pub visibility: VisibilityMap,
    pub errors: Vec<FieldError>,
    pub missing_required: Vec<String>,
    pub unknown_fields: Vec<String>,
    /// Values of visible fields, ready to persist.
    pub payload: FormValues,
}

impl SubmissionReport {
    /// Every message to show next to `field_id`.
    pub fn messages_for(&self, field_id: &str) -> Vec<String> {
        let mut messages = Vec::new();
        if self.missing_required.iter().any(|id| id == field_id) {
            messages.push(REQUIRED_MESSAGE.to_string());
        }
        if let Some(error) = self.errors.iter().find(|error| error.field_id == field_id) {
            messages.extend(error.messages.iter().cloned());
        }
        messages
    }
}

pub fn validate_submission(form: &FormDefinition, values: &FormValues) -> SubmissionReport {
    let visibility = resolve_visibility(form, values);

    let mut errors = Vec::new();
    let mut missing_required = Vec::new();
    let mut payload = FormValues::new();

    for field in &form.fields {
        if !visibility.get(&field.id).copied().unwrap_or(true) {
            continue;
        }

        let value = values.get(&field.id).unwrap_or(&Value::Null);
        if let Some(present) = values.get(&field.id) {
            payload.insert(field.id.clone(), present.clone());
        }

        if is_effectively_empty(value) && field.is_required {
            missing_required.push(field.id.clone());
            continue;
        }

        let mut messages = if is_effectively_empty(value) {
            Vec::new()
        } else {
            base_checks(field, value)
        };
        messages.extend(validate_field(field, value).error_messages);
        let messages = dedupe(messages);

        if !messages.is_empty() {
            errors.push(FieldError {
                field_id: field.id.clone(),
                path: format!("/{}", field.id),
                messages,
            });
        }
    }

    let known: BTreeSet<&str> = form.fields.iter().map(|field| field.id.as_str()).collect();
    let unknown_fields: Vec<String> = values
        .keys()
        .filter(|key| !known.contains(key.as_str()))
        .cloned()
        .collect();

    if !unknown_fields.is_empty() {
        tracing::debug!(form_id = %form.id, ?unknown_fields, "submission carries unknown fields");
    }

    SubmissionReport {
        valid: errors.is_empty() && missing_required.is_empty() && unknown_fields.is_empty(),
        visibility,
        errors,
        missing_required,
        unknown_fields,
        payload,
    }
}

/// Type and range constraints declared directly on the field.
fn base_checks(field: &FieldDefinition, value: &Value) -> Vec<String> {
    let mut messages = Vec::new();

    if field.kind.is_numeric() {
        match parse_float(value) {
            None => messages.push(NOT_A_NUMBER_MESSAGE.to_string()),
            Some(number) => {
                if let Some(min) = field.min
                    && number < min
                {
                    messages.push(format!("Value must be at least {}.", format_number(min)));
                }
                if let Some(max) = field.max
                    && number > max
                {
                    messages.push(format!("Value must be no more than {}.", format_number(max)));
                }
            }
        }
    }

    if let Value::String(text) = value {
        let len = text_length(text);
        if let Some(min_length) = field.min_length
            && len < min_length
        {
            messages.push(format!("Must be at least {min_length} characters."));
        }
        if let Some(max_length) = field.max_length
            && len > max_length
        {
            messages.push(format!("Must be no more than {max_length} characters."));
        }
    }

    let text = coerce_string(value);
    match field.kind {
        FieldType::Email if !is_email(&text) => messages.push(INVALID_EMAIL_MESSAGE.to_string()),
        FieldType::Url if !is_url(&text) => messages.push(INVALID_URL_MESSAGE.to_string()),
        _ => {}
    }

    if !field.options.is_empty() && !matches_options(field, value) {
        messages.push(INVALID_OPTION_MESSAGE.to_string());
    }

    messages
}

fn matches_options(field: &FieldDefinition, value: &Value) -> bool {
    if field.kind.is_single_choice() {
        return field.has_option_value(&coerce_string(value));
    }
    if field.kind.is_multi_choice() {
        return match value {
            Value::Array(items) => items
                .iter()
                .all(|item| field.has_option_value(&coerce_string(item))),
            Value::Bool(_) => true,
            single => field.has_option_value(&coerce_string(single)),
        };
    }
    true
}

fn dedupe(messages: Vec<String>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    messages
        .into_iter()
        .filter(|message| seen.insert(message.clone()))
        .collect()
}
