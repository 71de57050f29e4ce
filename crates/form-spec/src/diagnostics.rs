use std::fmt;

use serde_json::{Value, json};
use thiserror::Error;

use crate::spec::form::FormDefinition;
use crate::spec::logic::ConditionOperator;
use crate::spec::rule::RuleType;
use crate::validate::compile_pattern;

/// Reasons an evaluator fell back to its safe default.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationWarning {
    #[error("condition '{condition_id}' references unknown field '{source_field_id}'")]
    DanglingReference {
        condition_id: String,
        source_field_id: String,
    },
    #[error("condition '{condition_id}' depends on its own field")]
    SelfReference { condition_id: String },
    #[error("logic block '{block_id}' has no conditions")]
    EmptyLogicBlock { block_id: String },
    #[error("unknown condition operator '{0}'")]
    UnknownOperator(String),
    #[error("unsupported validation rule type '{0}'")]
    UnsupportedRule(String),
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

impl EvaluationWarning {
    pub fn code(&self) -> &'static str {
        match self {
            EvaluationWarning::DanglingReference { .. } => "dangling_reference",
            EvaluationWarning::SelfReference { .. } => "self_reference",
            EvaluationWarning::EmptyLogicBlock { .. } => "empty_logic_block",
            EvaluationWarning::UnknownOperator(_) => "unknown_operator",
            EvaluationWarning::UnsupportedRule(_) => "unsupported_rule",
            EvaluationWarning::InvalidPattern { .. } => "invalid_pattern",
        }
    }
}

/// A problem found in one field of a form definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormIssue {
    pub field_id: String,
    pub warning: EvaluationWarning,
}

impl FormIssue {
    pub fn to_json(&self) -> Value {
        json!({
            "field_id": self.field_id,
            "code": self.warning.code(),
            "message": self.warning.to_string(),
        })
    }
}

impl fmt::Display for FormIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field_id, self.warning)
    }
}

/// Lists every construct the evaluators would silently fail closed on.
pub fn lint(form: &FormDefinition) -> Vec<FormIssue> {
    let mut issues = Vec::new();

    for field in &form.fields {
        let mut push = |warning| {
            issues.push(FormIssue {
                field_id: field.id.clone(),
                warning,
            })
        };

        for block in &field.conditional_logic {
            if block.conditions.is_empty() {
                push(EvaluationWarning::EmptyLogicBlock {
                    block_id: block.id.clone(),
                });
            }
            for condition in &block.conditions {
                if condition.source_field_id == field.id {
                    push(EvaluationWarning::SelfReference {
                        condition_id: condition.id.clone(),
                    });
                } else if form.field(&condition.source_field_id).is_none() {
                    push(EvaluationWarning::DanglingReference {
                        condition_id: condition.id.clone(),
                        source_field_id: condition.source_field_id.clone(),
                    });
                }
                if let ConditionOperator::Unknown(name) = &condition.operator {
                    push(EvaluationWarning::UnknownOperator(name.clone()));
                }
            }
        }

        for rule in &field.advanced_validation_rules {
            match &rule.kind {
                RuleType::Unknown(name) => push(EvaluationWarning::UnsupportedRule(name.clone())),
                RuleType::Pattern => {
                    let pattern = rule.params.pattern.as_deref().unwrap_or_default();
                    if let Err(warning) = compile_pattern(pattern) {
                        push(warning);
                    }
                }
                _ => {}
            }
        }
    }

    issues
}
