use serde::Serialize;

use crate::form::form_model::{Control, FormDocument};
use crate::gateway::request::Part;

/// Multipart field holding [`FormMeta`].
pub const FORM_META_FIELD: &str = "formMeta";

/// What the server receives for one field, JSON-encoded under the field name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    pub value: String,
    #[serde(rename = "type")]
    pub input_type: String,
    pub id: String,
    pub required: bool,
    #[serde(rename = "validationDefinition")]
    pub validation_definition: Option<String>,
}

impl From<&Control> for FieldDescriptor {
    fn from(control: &Control) -> Self {
        Self {
            value: control.value.clone(),
            input_type: control.input_type.clone(),
            id: control.id.clone(),
            required: control.required,
            validation_definition: control.validation_definition.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormMeta {
    pub form_name: String,
    pub record_id: Option<String>,
    pub page_url: String,
}

/// Everything read from the form at submit time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedForm {
    pub fields: Vec<(String, FieldDescriptor)>,
    pub meta: FormMeta,
    pub honeypot: Option<String>,
}

impl CollectedForm {
    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|(name, _)| name.clone()).collect()
    }

    pub fn honeypot_filled(&self) -> bool {
        self.honeypot
            .as_deref()
            .is_some_and(|v| !v.trim().is_empty())
    }

    /// Encode fields and meta as multipart sections, followed by `files`.
    pub fn into_parts(self, files: Vec<Part>) -> Result<Vec<Part>, serde_json::Error> {
        let mut parts = Vec::with_capacity(self.fields.len() + files.len() + 1);

        for (name, descriptor) in &self.fields {
            parts.push(Part::text(name.clone(), serde_json::to_string(descriptor)?));
        }
        parts.push(Part::text(FORM_META_FIELD, serde_json::to_string(&self.meta)?));
        parts.extend(files);

        Ok(parts)
    }
}

pub fn collect_fields(doc: &FormDocument) -> CollectedForm {
    let fields = doc
        .controls
        .iter()
        .filter(|c| c.is_submittable())
        .map(|c| (c.name.clone(), FieldDescriptor::from(c)))
        .collect();

    CollectedForm {
        fields,
        meta: FormMeta {
            form_name: doc.name.clone(),
            record_id: doc.record_id.clone(),
            page_url: doc.page_url.clone(),
        },
        honeypot: doc.honeypot_value().map(str::to_string),
    }
}
