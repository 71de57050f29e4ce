//! Conditional visibility and field validation for form documents.
//!
//! Both evaluators are pure functions over a form's static field
//! definitions and the current value map. They never fail at their public
//! boundary: anything they cannot interpret is logged through `tracing` and
//! resolved to a safe default.

pub mod condition;
pub mod diagnostics;
pub mod render;
pub mod spec;
pub mod submission;
pub mod validate;
pub mod value;
pub mod visibility;

pub use condition::{evaluate_single_condition, is_field_visible};
pub use diagnostics::{EvaluationWarning, FormIssue, lint};
pub use render::{render_json, render_text};
pub use spec::{
    ConditionOperator, ConditionRule, FieldDefinition, FieldOption, FieldType, FormDefinition,
    FormError, LogicAction, LogicBlock, LogicType, RuleParams, RuleType, ValidationRule,
};
pub use submission::{FieldError, SubmissionReport, validate_submission};
pub use validate::{FieldValidation, validate_field};
pub use value::FormValues;
pub use visibility::{VisibilityMap, resolve_visibility, visible_values};
