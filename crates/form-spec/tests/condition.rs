use serde_json::{Value, json};

use form_spec::{
    ConditionOperator, ConditionRule, FieldDefinition, FieldType, FormValues,
    evaluate_single_condition, is_field_visible,
};

fn field(value: Value) -> FieldDefinition {
    serde_json::from_value(value).expect("field definition")
}

fn values(value: Value) -> FormValues {
    match value {
        Value::Object(map) => map,
        other => panic!("values must be an object, got {}", other),
    }
}

fn rule(operator: &str, value: Value) -> ConditionRule {
    serde_json::from_value(json!({
        "id": "c1",
        "sourceFieldId": "source",
        "operator": operator,
        "value": value,
    }))
    .expect("condition rule")
}

fn holds(operator: &str, actual: Value, expected: Value, source_type: FieldType) -> bool {
    evaluate_single_condition(&rule(operator, expected), &actual, &source_type)
}

fn source_fields() -> Vec<FieldDefinition> {
    vec![
        field(json!({ "id": "plan", "type": "select" })),
        field(json!({ "id": "seats", "type": "number" })),
        field(json!({ "id": "phone", "type": "phone" })),
    ]
}

fn block(id: &str, action: &str, logic_type: &str, conditions: Value) -> Value {
    json!({
        "id": id,
        "action": action,
        "logicType": logic_type,
        "conditions": conditions,
    })
}

fn condition(source: &str, operator: &str, value: Value) -> Value {
    json!({
        "id": format!("c-{}-{}", source, operator),
        "sourceFieldId": source,
        "operator": operator,
        "value": value,
    })
}

#[test]
fn statically_hidden_field_ignores_logic() {
    let target = field(json!({
        "id": "target",
        "type": "text",
        "isHidden": true,
        "conditionalLogic": [
            block("b1", "show", "all", json!([condition("plan", "equals", json!("pro"))]))
        ]
    }));
    let form_values = values(json!({ "plan": "pro" }));
    assert!(!is_field_visible(&target, &source_fields(), &form_values));
}

#[test]
fn field_without_logic_is_visible() {
    let target = field(json!({ "id": "target", "type": "text" }));
    assert!(is_field_visible(&target, &source_fields(), &FormValues::new()));
}

#[test]
fn matched_hide_block_beats_matched_show_block() {
    let target = field(json!({
        "id": "target",
        "type": "text",
        "conditionalLogic": [
            block("show", "show", "all", json!([condition("plan", "equals", json!("pro"))])),
            block("hide", "hide", "all", json!([condition("seats", "isGreaterThan", json!(10))])),
        ]
    }));
    let form_values = values(json!({ "plan": "pro", "seats": 25 }));
    assert!(!is_field_visible(&target, &source_fields(), &form_values));

    let form_values = values(json!({ "plan": "pro", "seats": 3 }));
    assert!(is_field_visible(&target, &source_fields(), &form_values));
}

#[test]
fn show_blocks_require_at_least_one_match() {
    let target = field(json!({
        "id": "target",
        "type": "text",
        "conditionalLogic": [
            block("pro", "show", "all", json!([condition("plan", "equals", json!("pro"))])),
            block("team", "show", "all", json!([condition("plan", "equals", json!("team"))])),
        ]
    }));
    let fields = source_fields();

    assert!(is_field_visible(&target, &fields, &values(json!({ "plan": "team" }))));
    assert!(is_field_visible(&target, &fields, &values(json!({ "plan": "pro" }))));
    assert!(!is_field_visible(&target, &fields, &values(json!({ "plan": "free" }))));
    assert!(!is_field_visible(&target, &fields, &FormValues::new()));
}

#[test]
fn unmatched_hide_block_leaves_field_visible() {
    let target = field(json!({
        "id": "target",
        "type": "text",
        "conditionalLogic": [
            block("hide", "hide", "all", json!([condition("plan", "equals", json!("free"))])),
        ]
    }));
    let form_values = values(json!({ "plan": "pro" }));
    assert!(is_field_visible(&target, &source_fields(), &form_values));
}

#[test]
fn all_and_any_combine_conditions() {
    let conditions = json!([
        condition("plan", "equals", json!("pro")),
        condition("seats", "isGreaterThanOrEqual", json!(5)),
    ]);
    let all = field(json!({
        "id": "all",
        "type": "text",
        "conditionalLogic": [block("b", "show", "all", conditions.clone())]
    }));
    let any = field(json!({
        "id": "any",
        "type": "text",
        "conditionalLogic": [block("b", "show", "any", conditions)]
    }));
    let fields = source_fields();
    let form_values = values(json!({ "plan": "pro", "seats": 2 }));

    assert!(!is_field_visible(&all, &fields, &form_values));
    assert!(is_field_visible(&any, &fields, &form_values));
}

#[test]
fn blocks_without_conditions_are_ignored() {
    let target = field(json!({
        "id": "target",
        "type": "text",
        "conditionalLogic": [block("empty", "show", "all", json!([]))]
    }));
    assert!(is_field_visible(&target, &source_fields(), &FormValues::new()));
}

#[test]
fn dangling_source_field_counts_as_not_met() {
    let shown = field(json!({
        "id": "shown",
        "type": "text",
        "conditionalLogic": [
            block("b", "show", "all", json!([condition("deleted", "isEmpty", Value::Null)]))
        ]
    }));
    let hidden = field(json!({
        "id": "hidden",
        "type": "text",
        "conditionalLogic": [
            block("b", "hide", "all", json!([condition("deleted", "isEmpty", Value::Null)]))
        ]
    }));
    let fields = source_fields();

    assert!(!is_field_visible(&shown, &fields, &FormValues::new()));
    assert!(is_field_visible(&hidden, &fields, &FormValues::new()));
}

#[test]
fn empty_phone_keeps_dependent_field_hidden() {
    let fields = source_fields();
    let sms_opt_in = field(json!({
        "id": "sms_opt_in",
        "type": "checkbox",
        "conditionalLogic": [
            block("b", "show", "all", json!([condition("phone", "isNotEmpty", Value::Null)]))
        ]
    }));

    assert!(!holds("isNotEmpty", json!(""), Value::Null, FieldType::Phone));
    assert!(!is_field_visible(&sms_opt_in, &fields, &values(json!({ "phone": "" }))));
    assert!(is_field_visible(
        &sms_opt_in,
        &fields,
        &values(json!({ "phone": "555 0100" }))
    ));
}

#[test]
fn emptiness_checks_cover_arrays_and_objects() {
    assert!(holds("isEmpty", json!([]), Value::Null, FieldType::MultiSelect));
    assert!(holds("isEmpty", json!({}), Value::Null, FieldType::File));
    assert!(holds("isEmpty", Value::Null, Value::Null, FieldType::Text));
    assert!(holds("isNotEmpty", json!(["a"]), Value::Null, FieldType::MultiSelect));
    assert!(holds("isNotEmpty", json!({ "name": "cv.pdf" }), Value::Null, FieldType::File));
    assert!(holds("isNotEmpty", json!(0), Value::Null, FieldType::Number));
    assert!(holds("isNotEmpty", json!(false), Value::Null, FieldType::Checkbox));
}

#[test]
fn number_source_compares_numerically() {
    assert!(holds("equals", json!("5"), json!(5), FieldType::Number));
    assert!(holds("equals", json!("5.0"), json!(5), FieldType::Number));
    assert!(holds("notEquals", json!("6"), json!(5), FieldType::Number));
    assert!(holds("equals", json!(5), json!("5"), FieldType::Text));
}

#[test]
fn text_source_with_numeric_string_compares_as_text() {
    assert!(holds("equals", json!("5"), json!(5), FieldType::Text));
    assert!(!holds("equals", json!("5.0"), json!(5), FieldType::Text));
}

#[test]
fn equality_is_null_aware() {
    assert!(holds("equals", Value::Null, Value::Null, FieldType::Text));
    assert!(!holds("equals", Value::Null, json!("x"), FieldType::Text));
    assert!(!holds("equals", json!("x"), Value::Null, FieldType::Text));
    assert!(holds("notEquals", Value::Null, json!("x"), FieldType::Text));
}

#[test]
fn boolean_values_compare_with_strings_and_booleans() {
    assert!(holds("equals", json!(true), json!(true), FieldType::Checkbox));
    assert!(holds("equals", json!(true), json!("true"), FieldType::Checkbox));
    assert!(!holds("equals", json!(false), json!("true"), FieldType::Checkbox));
}

#[test]
fn string_operators_coerce_values() {
    assert!(holds("contains", json!("hello world"), json!("lo w"), FieldType::Text));
    assert!(holds("notContains", json!("hello"), json!("bye"), FieldType::Text));
    assert!(holds("startsWith", json!("ACME-42"), json!("ACME"), FieldType::Text));
    assert!(holds("endsWith", json!(2024), json!("24"), FieldType::Number));
    assert!(holds("contains", json!(["tech", "design"]), json!("design"), FieldType::MultiSelect));
    assert!(!holds("startsWith", json!("acme"), json!("ACME"), FieldType::Text));
}

#[test]
fn ordering_operators_parse_numbers() {
    assert!(holds("isGreaterThan", json!("10"), json!(9), FieldType::Text));
    assert!(holds("isLessThan", json!(2.5), json!("3"), FieldType::Number));
    assert!(holds("isLessThanOrEqual", json!(3), json!(3), FieldType::Number));
    assert!(holds("isGreaterThanOrEquals", json!(3), json!(3), FieldType::Number));
    assert!(!holds("isGreaterThan", json!("many"), json!(3), FieldType::Text));
    assert!(!holds("isGreaterThan", Value::Null, json!(3), FieldType::Number));
    assert!(!holds("isLessThan", json!(3), Value::Null, FieldType::Number));
}

#[test]
fn ordering_operators_compare_dates() {
    assert!(holds("isGreaterThan", json!("2024-03-01"), json!("2024-02-28"), FieldType::Date));
    assert!(holds("isLessThan", json!("2024-03-01"), json!("2024-03-01T08:00"), FieldType::Text));
    assert!(holds("isLessThan", json!("09:30"), json!("17:00"), FieldType::Time));
    assert!(!holds("isGreaterThan", json!("2024-03-01"), json!("soon"), FieldType::Date));
}

#[test]
fn date_operators_use_local_midnight_for_bare_dates() {
    assert!(holds("isBefore", json!("2024-01-01"), json!("2024-06-01"), FieldType::Date));
    assert!(!holds("isAfter", json!("2024-01-01"), json!("2024-06-01"), FieldType::Date));
    assert!(holds("isOnOrBefore", json!("2024-06-01"), json!("2024-06-01"), FieldType::Date));
    assert!(holds("isOnOrAfter", json!("2024-06-01"), json!("2024-06-01"), FieldType::Date));
    assert!(!holds("isBefore", json!("2024-06-01"), json!("2024-06-01"), FieldType::Date));
    assert!(holds(
        "isAfter",
        json!("2024-06-01T00:30:00"),
        json!("2024-06-01"),
        FieldType::Datetime
    ));
}

#[test]
fn date_operators_fail_closed_on_unparseable_input() {
    assert!(!holds("isBefore", json!("not a date"), json!("2024-06-01"), FieldType::Date));
    assert!(!holds("isAfter", json!("2024-06-01"), json!(""), FieldType::Date));
    assert!(!holds("isOnOrAfter", Value::Null, json!("2024-06-01"), FieldType::Date));
}

#[test]
fn membership_checks_multi_select_values() {
    assert!(holds("isOneOf", json!(["a", "b"]), json!(["b", "c"]), FieldType::MultiSelect));
    assert!(!holds("isOneOf", json!(["a"]), json!(["b", "c"]), FieldType::MultiSelect));
    assert!(holds("isNoneOf", json!(["a", "d"]), json!(["b", "c"]), FieldType::MultiSelect));
    assert!(!holds("isNoneOf", json!(["a", "b"]), json!(["b", "c"]), FieldType::MultiSelect));
}

#[test]
fn membership_checks_single_values() {
    assert!(holds("isOneOf", json!("de"), json!(["us", "de"]), FieldType::Select));
    assert!(holds("isOneOf", json!("de"), json!("us, de"), FieldType::Select));
    assert!(holds("isOneOf", json!(3), json!([1, 2, 3]), FieldType::Rating));
    assert!(holds("isNoneOf", json!("fr"), json!(["us", "de"]), FieldType::Select));
    assert!(!holds("isOneOf", Value::Null, json!(["us"]), FieldType::Select));
}

#[test]
fn unknown_operator_fails_closed() {
    let parsed = rule("matchesRegex", json!("^a"));
    assert_eq!(
        parsed.operator,
        ConditionOperator::Unknown("matchesRegex".into())
    );
    assert!(!evaluate_single_condition(&parsed, &json!("abc"), &FieldType::Text));

    let round_trip = serde_json::to_value(&parsed).expect("serialize");
    assert_eq!(round_trip["operator"], "matchesRegex");
}

#[test]
fn clock_strings_are_not_dates_outside_time_fields() {
    assert!(holds("isGreaterThan", json!("12:00"), json!(5), FieldType::Text));
    assert!(!holds("isLessThan", json!("12:00"), json!(5), FieldType::Text));
    assert!(!holds("isBefore", json!("09:30"), json!("17:00"), FieldType::Text));
    assert!(holds("isBefore", json!("09:30"), json!("17:00"), FieldType::Time));
    assert!(holds("isOnOrAfter", json!("17:00:00"), json!("17:00"), FieldType::Time));
}

#[test]
fn bare_dates_compare_on_the_local_wall_clock() {
    assert!(holds(
        "isOnOrAfter",
        json!("2024-06-01"),
        json!("2024-06-01T00:00"),
        FieldType::Date
    ));
    assert!(holds(
        "isOnOrBefore",
        json!("2024-06-01"),
        json!("2024-06-01T00:00:00"),
        FieldType::Date
    ));
    assert!(!holds(
        "isBefore",
        json!("2024-06-01"),
        json!("2024-06-01T00:00"),
        FieldType::Date
    ));
    assert!(holds(
        "isBefore",
        json!("2024-05-31T23:59"),
        json!("2024-06-01"),
        FieldType::Datetime
    ));
}
