use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What a satisfied logic block does to its owning field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum LogicAction {
    Show,
    Hide,
}

/// How the conditions of one block are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogicType {
    /// Every condition must hold.
    #[default]
    All,
    /// At least one condition must hold.
    Any,
}

/// Comparison applied between a source field value and a literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum ConditionOperator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    IsGreaterThan,
    #[serde(alias = "isGreaterThanOrEquals")]
    IsGreaterThanOrEqual,
    IsLessThan,
    #[serde(alias = "isLessThanOrEquals")]
    IsLessThanOrEqual,
    IsBefore,
    IsAfter,
    IsOnOrBefore,
    IsOnOrAfter,
    IsOneOf,
    IsNoneOf,
    IsEmpty,
    IsNotEmpty,
    /// Operator names written by newer or foreign form builders.
    #[serde(untagged)]
    Unknown(String),
}

impl ConditionOperator {
    pub fn as_str(&self) -> &str {
        match self {
            ConditionOperator::Equals => "equals",
            ConditionOperator::NotEquals => "notEquals",
            ConditionOperator::Contains => "contains",
            ConditionOperator::NotContains => "notContains",
            ConditionOperator::StartsWith => "startsWith",
            ConditionOperator::EndsWith => "endsWith",
            ConditionOperator::IsGreaterThan => "isGreaterThan",
            ConditionOperator::IsGreaterThanOrEqual => "isGreaterThanOrEqual",
            ConditionOperator::IsLessThan => "isLessThan",
            ConditionOperator::IsLessThanOrEqual => "isLessThanOrEqual",
            ConditionOperator::IsBefore => "isBefore",
            ConditionOperator::IsAfter => "isAfter",
            ConditionOperator::IsOnOrBefore => "isOnOrBefore",
            ConditionOperator::IsOnOrAfter => "isOnOrAfter",
            ConditionOperator::IsOneOf => "isOneOf",
            ConditionOperator::IsNoneOf => "isNoneOf",
            ConditionOperator::IsEmpty => "isEmpty",
            ConditionOperator::IsNotEmpty => "isNotEmpty",
            ConditionOperator::Unknown(name) => name,
        }
    }
}

/// A single comparison against another field's current value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConditionRule {
    pub id: String,
    pub source_field_id: String,
    pub operator: ConditionOperator,
    #[serde(default)]
    pub value: Value,
}

/// Named show/hide rule attached to a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LogicBlock {
    pub id: String,
    pub action: LogicAction,
    #[serde(default)]
    pub logic_type: LogicType,
    #[serde(default)]
    pub conditions: Vec<ConditionRule>,
}
