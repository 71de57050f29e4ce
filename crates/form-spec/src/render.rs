use serde_json::{Map, Value, json};

use crate::spec::form::FormDefinition;
use crate::submission::SubmissionReport;
use crate::value::coerce_string;

/// Render a submission report as a structured JSON value.
pub fn render_json(form: &FormDefinition, report: &SubmissionReport) -> Value {
    let fields = form
        .fields
        .iter()
        .map(|field| {
            let mut map = Map::new();
            map.insert("id".into(), Value::String(field.id.clone()));
            map.insert("label".into(), Value::String(field.label.clone()));
            map.insert("type".into(), Value::String(field.kind.as_str().to_string()));
            map.insert("required".into(), Value::Bool(field.is_required));
            map.insert(
                "visible".into(),
                Value::Bool(report.visibility.get(&field.id).copied().unwrap_or(true)),
            );
            if let Some(value) = report.payload.get(&field.id) {
                map.insert("value".into(), value.clone());
            }
            let messages = report.messages_for(&field.id);
            if !messages.is_empty() {
                map.insert(
                    "errors".into(),
                    Value::Array(messages.into_iter().map(Value::String).collect()),
                );
            }
            Value::Object(map)
        })
        .collect::<Vec<_>>();
    let status = if report.valid { "valid" } else { "invalid" };

    json!({
        "form_id": form.id,
        "form_title": form.title,
        "status": status,
        "missing_required": report.missing_required,
        "unknown_fields": report.unknown_fields,
        "fields": fields,
        "payload": report.payload,
    })
}

/// Render a submission report as human-friendly text.
pub fn render_text(form: &FormDefinition, report: &SubmissionReport) -> String {
    let mut lines = Vec::new();
    lines.push(format!("Form: {} ({})", form.title, form.id));
    lines.push(format!(
        "Status: {}",
        if report.valid { "valid" } else { "invalid" }
    ));

    lines.push("Visible fields:".to_string());
    for field in form
        .fields
        .iter()
        .filter(|field| report.visibility.get(&field.id).copied().unwrap_or(true))
    {
        let mut entry = format!(" - {} ({})", field.id, field.label);
        if field.is_required {
            entry.push_str(" [required]");
        }
        if let Some(value) = report.payload.get(&field.id) {
            entry.push_str(&format!(" = {}", value_to_display(value)));
        }
        lines.push(entry);
        for message in report.messages_for(&field.id) {
            lines.push(format!("     ! {}", message));
        }
    }

    let hidden = report
        .visibility
        .iter()
        .filter(|(_, visible)| !**visible)
        .map(|(id, _)| id.as_str())
        .collect::<Vec<_>>();
    if !hidden.is_empty() {
        lines.push(format!("Hidden fields: {}", hidden.join(", ")));
    }

    if !report.unknown_fields.is_empty() {
        lines.push(format!("Unknown fields: {}", report.unknown_fields.join(", ")));
    }

    lines.join("\n")
}

fn value_to_display(value: &Value) -> String {
    match value {
        Value::String(text) => format!("\"{}\"", text),
        Value::Array(_) => format!("[{}]", coerce_string(value)),
        other => coerce_string(other),
    }
}
