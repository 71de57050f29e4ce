use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::value::parse_float;

/// Kinds of advanced validation rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum RuleType {
    Required,
    MinLength,
    MaxLength,
    ExactLength,
    Pattern,
    IsEmail,
    #[serde(rename = "isURL", alias = "isUrl")]
    IsUrl,
    MinValue,
    MaxValue,
    NumberInteger,
    StringContains,
    StringNotContains,
    #[serde(untagged)]
    Unknown(String),
}

impl RuleType {
    pub fn as_str(&self) -> &str {
        match self {
            RuleType::Required => "required",
            RuleType::MinLength => "minLength",
            RuleType::MaxLength => "maxLength",
            RuleType::ExactLength => "exactLength",
            RuleType::Pattern => "pattern",
            RuleType::IsEmail => "isEmail",
            RuleType::IsUrl => "isURL",
            RuleType::MinValue => "minValue",
            RuleType::MaxValue => "maxValue",
            RuleType::NumberInteger => "numberInteger",
            RuleType::StringContains => "stringContains",
            RuleType::StringNotContains => "stringNotContains",
            RuleType::Unknown(name) => name,
        }
    }
}

/// Parameters consumed by the individual rule kinds.
///
/// `length` and `value` are kept as raw JSON because form builders store
/// them both as numbers and as numeric strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
pub struct RuleParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl RuleParams {
    pub fn length_limit(&self) -> Option<f64> {
        self.length.as_ref().and_then(parse_float)
    }

    pub fn numeric_value(&self) -> Option<f64> {
        self.value.as_ref().and_then(parse_float)
    }
}

/// A single constraint attached to a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRule {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: RuleType,
    #[serde(default)]
    pub params: RuleParams,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl ValidationRule {
    pub fn new(id: impl Into<String>, kind: RuleType) -> Self {
        Self {
            id: id.into(),
            kind,
            params: RuleParams::default(),
            custom_message: None,
            is_active: None,
        }
    }

    /// Rules without an explicit flag are active.
    pub fn is_active(&self) -> bool {
        self.is_active != Some(false)
    }

    /// The author's message when set, otherwise `fallback`.
    pub fn message_or(&self, fallback: impl FnOnce() -> String) -> String {
        match self.custom_message.as_deref().map(str::trim) {
            Some(message) if !message.is_empty() => message.to_string(),
            _ => fallback(),
        }
    }
}
