use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::spec::field::FieldDefinition;

/// Failures while loading a form document.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("failed to parse form document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("field id '{0}' is used more than once")]
    DuplicateField(String),
}

/// Ordered field list of one published form version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormDefinition {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

impl FormDefinition {
    /// Parses a form document and checks that field ids are unique.
    pub fn from_json_str(input: &str) -> Result<Self, FormError> {
        let form: FormDefinition = serde_json::from_str(input)?;
        form.ensure_unique_ids()?;
        Ok(form)
    }

    pub fn field(&self, id: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|field| field.id == id)
    }

    pub fn ensure_unique_ids(&self) -> Result<(), FormError> {
        let mut seen = BTreeSet::new();
        for field in &self.fields {
            if !seen.insert(field.id.as_str()) {
                return Err(FormError::DuplicateField(field.id.clone()));
            }
        }
        Ok(())
    }
}
