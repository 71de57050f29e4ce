//! Show/hide resolution for a single field.
//!
//! Logic blocks are scanned in order. A satisfied `hide` block wins over
//! everything and ends the scan; otherwise a field with at least one `show`
//! block is visible only when one of those blocks is satisfied. Every
//! comparison fails closed: unknown operators and dangling field references
//! count as "not met" and are logged.

use std::cmp::Ordering;

use chrono::NaiveDateTime;

use serde_json::Value;

use crate::diagnostics::EvaluationWarning;
use crate::spec::field::{FieldDefinition, FieldType};
use crate::spec::logic::{ConditionOperator, ConditionRule, LogicAction, LogicBlock, LogicType};
use crate::value::{FormValues, coerce_string, parse_clock, parse_date, parse_float};

/// Decides whether `field` is visible given the current form values.
pub fn is_field_visible(
    field: &FieldDefinition,
    all_fields: &[FieldDefinition],
    values: &FormValues,
) -> bool {
    if field.is_hidden {
        return false;
    }
    if field.conditional_logic.is_empty() {
        return true;
    }

    let mut hide_matched = false;
    let mut show_defined = false;
    let mut show_matched = false;

    for block in &field.conditional_logic {
        if block.conditions.is_empty() {
            continue;
        }
        if block.action == LogicAction::Show {
            show_defined = true;
        }
        if !block_satisfied(field, block, all_fields, values) {
            continue;
        }
        match block.action {
            LogicAction::Hide => {
                hide_matched = true;
                break;
            }
            LogicAction::Show => show_matched = true,
        }
    }

    if hide_matched {
        false
    } else if show_defined {
        show_matched
    } else {
        true
    }
}

fn block_satisfied(
    field: &FieldDefinition,
    block: &LogicBlock,
    all_fields: &[FieldDefinition],
    values: &FormValues,
) -> bool {
    let holds = |rule: &ConditionRule| condition_holds(field, rule, all_fields, values);
    match block.logic_type {
        LogicType::All => block.conditions.iter().all(holds),
        LogicType::Any => block.conditions.iter().any(holds),
    }
}

fn condition_holds(
    field: &FieldDefinition,
    rule: &ConditionRule,
    all_fields: &[FieldDefinition],
    values: &FormValues,
) -> bool {
    let Some(source) = all_fields
        .iter()
        .find(|candidate| candidate.id == rule.source_field_id)
    else {
        let warning = EvaluationWarning::DanglingReference {
            condition_id: rule.id.clone(),
            source_field_id: rule.source_field_id.clone(),
        };
        tracing::warn!(field_id = %field.id, %warning, "condition treated as not met");
        return false;
    };

    let actual = values.get(&rule.source_field_id).unwrap_or(&Value::Null);
    evaluate_single_condition(rule, actual, &source.kind)
}

/// Compares `actual` (the source field's current value) against the rule's
/// literal using the rule's operator.
pub fn evaluate_single_condition(
    rule: &ConditionRule,
    actual: &Value,
    source_type: &FieldType,
) -> bool {
    match check_condition(&rule.operator, actual, &rule.value, source_type) {
        Ok(met) => met,
        Err(warning) => {
            tracing::warn!(condition_id = %rule.id, %warning, "condition treated as not met");
            false
        }
    }
}

pub(crate) fn check_condition(
    operator: &ConditionOperator,
    actual: &Value,
    expected: &Value,
    source_type: &FieldType,
) -> Result<bool, EvaluationWarning> {
    let met = match operator {
        ConditionOperator::IsEmpty => is_blank(actual),
        ConditionOperator::IsNotEmpty => !is_blank(actual),
        ConditionOperator::Equals => values_equal(actual, expected, source_type),
        ConditionOperator::NotEquals => !values_equal(actual, expected, source_type),
        ConditionOperator::Contains => coerce_string(actual).contains(&coerce_string(expected)),
        ConditionOperator::NotContains => {
            !coerce_string(actual).contains(&coerce_string(expected))
        }
        ConditionOperator::StartsWith => {
            coerce_string(actual).starts_with(&coerce_string(expected))
        }
        ConditionOperator::EndsWith => coerce_string(actual).ends_with(&coerce_string(expected)),
        ConditionOperator::IsGreaterThan => {
            compare_ordered(actual, expected, source_type, Ordering::is_gt)
        }
        ConditionOperator::IsGreaterThanOrEqual => {
            compare_ordered(actual, expected, source_type, Ordering::is_ge)
        }
        ConditionOperator::IsLessThan => {
            compare_ordered(actual, expected, source_type, Ordering::is_lt)
        }
        ConditionOperator::IsLessThanOrEqual => {
            compare_ordered(actual, expected, source_type, Ordering::is_le)
        }
        ConditionOperator::IsBefore => {
            compare_dates(actual, expected, source_type, Ordering::is_lt)
        }
        ConditionOperator::IsAfter => {
            compare_dates(actual, expected, source_type, Ordering::is_gt)
        }
        ConditionOperator::IsOnOrBefore => {
            compare_dates(actual, expected, source_type, Ordering::is_le)
        }
        ConditionOperator::IsOnOrAfter => {
            compare_dates(actual, expected, source_type, Ordering::is_ge)
        }
        ConditionOperator::IsOneOf => {
            let allowed = string_set(expected);
            match actual {
                Value::Array(items) => items
                    .iter()
                    .any(|item| allowed.contains(&coerce_string(item))),
                single => allowed.contains(&coerce_string(single)),
            }
        }
        ConditionOperator::IsNoneOf => {
            let excluded = string_set(expected);
            match actual {
                Value::Array(items) => items
                    .iter()
                    .all(|item| !excluded.contains(&coerce_string(item))),
                single => !excluded.contains(&coerce_string(single)),
            }
        }
        ConditionOperator::Unknown(name) => {
            return Err(EvaluationWarning::UnknownOperator(name.clone()));
        }
    };
    Ok(met)
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(entries) => entries.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

fn values_equal(actual: &Value, expected: &Value, source_type: &FieldType) -> bool {
    match (actual.is_null(), expected.is_null()) {
        (true, true) => return true,
        (true, false) | (false, true) => return false,
        (false, false) => {}
    }

    if actual.is_number() || *source_type == FieldType::Number {
        return match (parse_float(actual), parse_float(expected)) {
            (Some(left), Some(right)) => left == right,
            _ => false,
        };
    }

    if let Value::Bool(flag) = actual {
        return coerce_string(expected) == flag.to_string();
    }

    coerce_string(actual) == coerce_string(expected)
}

fn compare_ordered(
    actual: &Value,
    expected: &Value,
    source_type: &FieldType,
    accept: fn(Ordering) -> bool,
) -> bool {
    if actual.is_null() || expected.is_null() {
        return false;
    }

    if source_type.is_temporal() || parse_date(actual).is_some() {
        return compare_dates(actual, expected, source_type, accept);
    }

    match (parse_float(actual), parse_float(expected)) {
        (Some(left), Some(right)) => left.partial_cmp(&right).is_some_and(accept),
        _ => false,
    }
}

fn compare_dates(
    actual: &Value,
    expected: &Value,
    source_type: &FieldType,
    accept: fn(Ordering) -> bool,
) -> bool {
    match (
        parse_temporal(actual, source_type),
        parse_temporal(expected, source_type),
    ) {
        (Some(left), Some(right)) => accept(left.cmp(&right)),
        _ => false,
    }
}

/// Literal of a membership operator as a list of strings. A plain string is
/// read as a comma separated list.
fn string_set(expected: &Value) -> Vec<String> {
    match expected {
        Value::Null => Vec::new(),
        Value::Array(items) => items.iter().map(coerce_string).collect(),
        Value::String(text) => text
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::to_string)
            .collect(),
        other => vec![coerce_string(other)],
    }
}

/// Clock strings only count as points in time on `time` fields.
fn parse_temporal(value: &Value, source_type: &FieldType) -> Option<NaiveDateTime> {
    match source_type {
        FieldType::Time => parse_date(value).or_else(|| parse_clock(value)),
        _ => parse_date(value),
    }
}
