use crate::form::form_model::{Control, FormDocument};
use crate::util::pattern::compile_html_pattern;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    Missing,
    PatternMismatch,
}

impl Violation {
    pub fn message(&self) -> &'static str {
        match self {
            Violation::Missing => "This field is required.",
            Violation::PatternMismatch => "Please match the requested format.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintViolation {
    pub field: String,
    pub violation: Violation,
}

/// Native constraint validation: `required` and `pattern` on submittable
/// controls. Patterns the engine can't compile are skipped; the server
/// re-validates anyway.
pub fn check_constraints(doc: &FormDocument) -> Vec<ConstraintViolation> {
    doc.controls
        .iter()
        .filter(|c| c.is_submittable())
        .filter_map(|c| check_control(c).map(|violation| ConstraintViolation {
            field: c.name.clone(),
            violation,
        }))
        .collect()
}

fn check_control(control: &Control) -> Option<Violation> {
    let value = control.value.trim();

    if value.is_empty() {
        return control.required.then_some(Violation::Missing);
    }

    let pattern = control.pattern.as_deref()?;
    match compile_html_pattern(pattern) {
        Some(re) if !re.is_match(&control.value) => Some(Violation::PatternMismatch),
        Some(_) => None,
        None => {
            log::debug!("skipping uncompilable pattern on '{}'", control.name);
            None
        }
    }
}
