use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::alert::alert_model::AlertNode;
use crate::form::classes::{FIELD_ERROR, HONEYPOT_NAME};
use crate::form::highlight::{highlight_segments, reject_ranges, render_highlight};
use crate::util::sanitize::text_fingerprint;

// ============================================================================
// Controls
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlTag {
    Input,
    Textarea,
    Select,
    Button,
}

/// Inline error output rendered next to a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorOutput {
    pub id: String,
    pub messages: Vec<String>,
    /// Current value with rejected substrings marked up
    pub highlight: Option<String>,
}

/// One interactive element of a form.
#[derive(Debug, Clone, PartialEq)]
pub struct Control {
    pub id: String,
    pub name: String,
    pub tag: ControlTag,
    /// HTML `type` (`text`, `email`, `file`, ...). Textareas report `textarea`.
    pub input_type: String,
    pub value: String,
    pub default_value: String,
    pub required: bool,
    pub disabled: bool,
    pub pattern: Option<String>,
    /// Opaque token naming a server-side validation definition
    pub validation_definition: Option<String>,

    pub aria_invalid: bool,
    pub aria_errormessage: Option<String>,
    pub error_output: Option<ErrorOutput>,
}

impl Control {
    fn new(tag: ControlTag, name: &str, input_type: &str) -> Self {
        Self {
            id: name.to_string(),
            name: name.to_string(),
            tag,
            input_type: input_type.to_string(),
            value: String::new(),
            default_value: String::new(),
            required: false,
            disabled: false,
            pattern: None,
            validation_definition: None,
            aria_invalid: false,
            aria_errormessage: None,
            error_output: None,
        }
    }

    pub fn input(name: &str, input_type: &str) -> Self {
        Self::new(ControlTag::Input, name, input_type)
    }

    pub fn textarea(name: &str) -> Self {
        Self::new(ControlTag::Textarea, name, "textarea")
    }

    pub fn select(name: &str) -> Self {
        Self::new(ControlTag::Select, name, "select-one")
    }

    pub fn button(name: &str) -> Self {
        Self::new(ControlTag::Button, name, "submit")
    }

    /// The hidden trap field.
    pub fn honeypot() -> Self {
        Self::new(ControlTag::Input, HONEYPOT_NAME, "text")
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self
    }

    /// Value restored by a form reset.
    pub fn with_default(mut self, value: &str) -> Self {
        self.default_value = value.to_string();
        self.value = value.to_string();
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_pattern(mut self, pattern: &str) -> Self {
        self.pattern = Some(pattern.to_string());
        self
    }

    pub fn with_validation(mut self, definition: &str) -> Self {
        self.validation_definition = Some(definition.to_string());
        self
    }

    pub fn is_honeypot(&self) -> bool {
        self.name == HONEYPOT_NAME
    }

    /// Whether the value travels in a submission payload.
    pub fn is_submittable(&self) -> bool {
        if self.is_honeypot() || self.tag == ControlTag::Button {
            return false;
        }
        !matches!(
            self.input_type.as_str(),
            "submit" | "button" | "reset" | "image" | "file"
        )
    }

    /// Stable id of this field's inline error output.
    pub fn error_output_id(&self) -> String {
        format!("{}-{}", FIELD_ERROR, &text_fingerprint(&self.name)[..10])
    }

    /// Mark invalid and (re)attach one message per error.
    pub fn show_errors(&mut self, messages: &[String], highlight: Option<String>) {
        let id = self.error_output_id();
        self.aria_invalid = true;
        self.aria_errormessage = Some(id.clone());
        self.error_output = Some(ErrorOutput {
            id,
            messages: messages.to_vec(),
            highlight,
        });
    }

    pub fn clear_errors(&mut self) {
        self.aria_invalid = false;
        self.aria_errormessage = None;
        self.error_output = None;
    }

    pub fn reset(&mut self) {
        self.value = self.default_value.clone();
    }
}

// ============================================================================
// Keystroke watches
// ============================================================================

/// Server-flagged content on a field, re-checked on every input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldWatch {
    pub errors: Vec<String>,
    pub rejects: Vec<String>,
}

impl FieldWatch {
    /// Re-evaluate `control` after its value changed. Returns true while a
    /// rejected substring is still present.
    pub fn recheck(&self, control: &mut Control) -> bool {
        if reject_ranges(&control.value, &self.rejects).is_empty() {
            control.clear_errors();
            return false;
        }

        let segments = highlight_segments(&control.value, &self.rejects);
        control.show_errors(&self.errors, Some(render_highlight(&segments)));
        true
    }
}

// ============================================================================
// Alert region
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Opacity {
    Transparent,
    Opaque,
}

/// The alert output area layered over a form.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertRegion {
    pub hidden: bool,
    pub opacity: Opacity,
    pub nodes: Vec<AlertNode>,
}

impl Default for AlertRegion {
    fn default() -> Self {
        Self {
            hidden: true,
            opacity: Opacity::Transparent,
            nodes: Vec::new(),
        }
    }
}

// ============================================================================
// Form document
// ============================================================================

#[derive(Debug, Clone)]
pub struct FormDocument {
    pub name: String,
    /// Post or record the form is bound to
    pub record_id: Option<String>,
    pub page_url: String,
    pub controls: Vec<Control>,
    pub alert_region: Option<AlertRegion>,
    pub locked: bool,
    /// Keyed by control name; at most one per field
    pub watches: HashMap<String, FieldWatch>,
}

impl FormDocument {
    pub fn new(name: &str, page_url: &str) -> Self {
        Self {
            name: name.to_string(),
            record_id: None,
            page_url: page_url.to_string(),
            controls: Vec::new(),
            alert_region: None,
            locked: false,
            watches: HashMap::new(),
        }
    }

    pub fn with_record_id(mut self, id: &str) -> Self {
        self.record_id = Some(id.to_string());
        self
    }

    pub fn with_control(mut self, control: Control) -> Self {
        self.controls.push(control);
        self
    }

    pub fn with_alert_region(mut self) -> Self {
        self.alert_region = Some(AlertRegion::default());
        self
    }

    pub fn control(&self, name: &str) -> Option<&Control> {
        self.controls.iter().find(|c| c.name == name)
    }

    pub fn control_mut(&mut self, name: &str) -> Option<&mut Control> {
        self.controls.iter_mut().find(|c| c.name == name)
    }

    pub fn honeypot_value(&self) -> Option<&str> {
        self.controls
            .iter()
            .find(|c| c.is_honeypot())
            .map(|c| c.value.as_str())
    }

    /// Restore every control to its default value and drop inline errors
    /// and watches.
    pub fn reset(&mut self) {
        for control in &mut self.controls {
            control.reset();
            control.clear_errors();
        }
        self.watches.clear();
    }
}

/// Shared handle to a form document.
///
/// Every component of one form's runtime holds a clone. The lock is never
/// held across an await point.
#[derive(Debug, Clone)]
pub struct Form {
    inner: Arc<Mutex<FormDocument>>,
}

impl Form {
    pub fn new(document: FormDocument) -> Self {
        Self {
            inner: Arc::new(Mutex::new(document)),
        }
    }

    /// Run `f` against the document.
    pub fn with<R>(&self, f: impl FnOnce(&mut FormDocument) -> R) -> R {
        let mut doc = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut doc)
    }

    pub fn snapshot(&self) -> FormDocument {
        self.with(|doc| doc.clone())
    }

    pub fn name(&self) -> String {
        self.with(|doc| doc.name.clone())
    }

    pub fn is_locked(&self) -> bool {
        self.with(|doc| doc.locked)
    }

    pub fn control(&self, name: &str) -> Option<Control> {
        self.with(|doc| doc.control(name).cloned())
    }

    pub fn alert_region(&self) -> Option<AlertRegion> {
        self.with(|doc| doc.alert_region.clone())
    }

    /// Add a control after construction, the way blocks inject fields.
    pub fn add_control(&self, control: Control) {
        self.with(|doc| doc.controls.push(control));
    }

    pub fn remove_control(&self, name: &str) -> bool {
        self.with(|doc| {
            let before = doc.controls.len();
            doc.controls.retain(|c| c.name != name);
            doc.watches.remove(name);
            doc.controls.len() != before
        })
    }

    /// Set a value programmatically. No input event fires.
    pub fn set_value(&self, name: &str, value: &str) -> bool {
        self.with(|doc| match doc.control_mut(name) {
            Some(control) => {
                control.value = value.to_string();
                true
            }
            None => false,
        })
    }

    /// Set a value as the user typing would: the field's watch, if any,
    /// runs afterwards.
    pub fn input(&self, name: &str, value: &str) -> bool {
        self.with(|doc| {
            let watch = doc.watches.get(name).cloned();
            match doc.control_mut(name) {
                Some(control) => {
                    control.value = value.to_string();
                    if let Some(watch) = watch {
                        watch.recheck(control);
                    }
                    true
                }
                None => false,
            }
        })
    }

    pub fn reset(&self) {
        self.with(FormDocument::reset);
    }
}
