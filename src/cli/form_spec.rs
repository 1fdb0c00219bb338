use serde::{Deserialize, Serialize};

use crate::form::form_model::{Control, ControlTag, FormDocument};
use crate::util::sanitize::slugify_name;

/// A form as written in a YAML description file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSpec {
    pub name: String,

    pub record_id: Option<String>,

    #[serde(default)]
    pub page_url: String,

    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Defaults to the slugged label
    #[serde(default)]
    pub name: String,

    pub label: Option<String>,

    pub id: Option<String>,

    #[serde(default = "default_tag")]
    pub tag: ControlTag,

    #[serde(rename = "type", default = "default_type")]
    pub input_type: String,

    #[serde(default)]
    pub value: String,

    #[serde(default)]
    pub required: bool,

    pub pattern: Option<String>,

    /// Validation definition name from the inline settings
    pub validation: Option<String>,
}

fn default_tag() -> ControlTag { ControlTag::Input }
fn default_type() -> String { "text".to_string() }

impl FormSpec {
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Build the document the save component would have rendered: the
    /// described fields, a honeypot and an alert region.
    pub fn to_document(&self) -> FormDocument {
        let mut doc = FormDocument::new(&self.name, &self.page_url).with_alert_region();
        if let Some(id) = &self.record_id {
            doc = doc.with_record_id(id);
        }

        for field in &self.fields {
            doc = doc.with_control(field.to_control());
        }

        if doc.honeypot_value().is_none() {
            doc = doc.with_control(Control::honeypot());
        }

        doc
    }
}

impl FieldSpec {
    pub fn field_name(&self) -> String {
        match (&self.label, self.name.is_empty()) {
            (Some(label), true) => slugify_name(label),
            _ => self.name.clone(),
        }
    }

    fn to_control(&self) -> Control {
        let name = self.field_name();
        let mut control = match self.tag {
            ControlTag::Input => Control::input(&name, &self.input_type),
            ControlTag::Textarea => Control::textarea(&name),
            ControlTag::Select => Control::select(&name),
            ControlTag::Button => Control::button(&name),
        };

        control = control.with_value(&self.value);
        if let Some(id) = &self.id {
            control = control.with_id(id);
        }
        if self.required {
            control = control.required();
        }
        if let Some(pattern) = &self.pattern {
            control = control.with_pattern(pattern);
        }
        if let Some(validation) = &self.validation {
            control = control.with_validation(validation);
        }

        control
    }
}
