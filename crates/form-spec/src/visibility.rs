use crate::condition::is_field_visible;
use crate::spec::form::FormDefinition;
use crate::value::FormValues;

pub type VisibilityMap = std::collections::BTreeMap<String, bool>;

pub fn resolve_visibility(form: &FormDefinition, values: &FormValues) -> VisibilityMap {
    form.fields
        .iter()
        .map(|field| {
            (
                field.id.clone(),
                is_field_visible(field, &form.fields, values),
            )
        })
        .collect()
}

/// Values of the visible fields only. Hidden fields and unknown keys are
/// dropped from the submission payload.
pub fn visible_values(form: &FormDefinition, values: &FormValues) -> FormValues {
    let visibility = resolve_visibility(form, values);
    form.fields
        .iter()
        .filter(|field| visibility.get(&field.id).copied().unwrap_or(true))
        .filter_map(|field| {
            values
                .get(&field.id)
                .map(|value| (field.id.clone(), value.clone()))
        })
        .collect()
}
