use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::logic::LogicBlock;
use crate::spec::rule::ValidationRule;

/// Supported field kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum FieldType {
    Text,
    Textarea,
    Email,
    Phone,
    Url,
    Number,
    Select,
    MultiSelect,
    Radio,
    Checkbox,
    Date,
    Time,
    Datetime,
    Rating,
    File,
    /// Field kinds this crate does not know about; kept verbatim.
    #[serde(untagged)]
    Other(String),
}

impl FieldType {
    /// Date and time kinds, compared chronologically by ordering operators.
    pub fn is_temporal(&self) -> bool {
        matches!(self, FieldType::Date | FieldType::Time | FieldType::Datetime)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldType::Number | FieldType::Rating)
    }

    /// Kinds whose value must be one of the field options.
    pub fn is_single_choice(&self) -> bool {
        matches!(self, FieldType::Select | FieldType::Radio)
    }

    pub fn is_multi_choice(&self) -> bool {
        matches!(self, FieldType::MultiSelect | FieldType::Checkbox)
    }

    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Email => "email",
            FieldType::Phone => "phone",
            FieldType::Url => "url",
            FieldType::Number => "number",
            FieldType::Select => "select",
            FieldType::MultiSelect => "multiSelect",
            FieldType::Radio => "radio",
            FieldType::Checkbox => "checkbox",
            FieldType::Date => "date",
            FieldType::Time => "time",
            FieldType::Datetime => "datetime",
            FieldType::Rating => "rating",
            FieldType::File => "file",
            FieldType::Other(kind) => kind,
        }
    }
}

/// One selectable entry of a choice field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FieldOption {
    pub id: String,
    pub label: String,
    pub value: String,
}

/// Static description of a single form field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: FieldType,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditional_logic: Vec<LogicBlock>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub advanced_validation_rules: Vec<ValidationRule>,
}

impl FieldDefinition {
    /// Bare field with no constraints, logic or rules.
    pub fn new(id: impl Into<String>, kind: FieldType) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            kind,
            is_required: false,
            is_hidden: false,
            options: Vec::new(),
            min: None,
            max: None,
            min_length: None,
            max_length: None,
            conditional_logic: Vec::new(),
            advanced_validation_rules: Vec::new(),
        }
    }

    pub fn has_option_value(&self, value: &str) -> bool {
        self.options.iter().any(|option| option.value == value)
    }
}
