use crate::form::constraints::ConstraintViolation;
use crate::form::form_model::{FieldWatch, FormDocument};
use crate::gateway::response::SubmissionResult;

/// Drop inline errors left from an earlier attempt. Fields still watched for
/// rejected content keep theirs until the user edits them.
pub fn clear_stale_errors(doc: &mut FormDocument) {
    let FormDocument {
        controls, watches, ..
    } = doc;

    for control in controls.iter_mut().filter(|c| c.is_submittable()) {
        if !watches.contains_key(&control.name) {
            control.clear_errors();
        }
    }
}

pub fn mark_violations(doc: &mut FormDocument, violations: &[ConstraintViolation]) {
    for violation in violations {
        if let Some(control) = doc.control_mut(&violation.field) {
            control.show_errors(&[violation.violation.message().to_string()], None);
        }
    }
}

/// Attach server validation errors to the submitted fields.
///
/// Watches of the submitted fields are replaced, so each field has at most
/// one per cycle. Returns the number of fields marked invalid.
pub fn reconcile(doc: &mut FormDocument, submitted: &[String], result: &SubmissionResult) -> usize {
    let mut marked = 0;

    for name in submitted {
        doc.watches.remove(name);

        let Some(entry) = result.field(name) else {
            continue;
        };

        let watch = (!entry.rejects.is_empty()).then(|| FieldWatch {
            errors: entry.errors.clone(),
            rejects: entry.rejects.clone(),
        });
        if let Some(watch) = &watch {
            doc.watches.insert(name.clone(), watch.clone());
        }

        let Some(control) = doc.control_mut(name) else {
            continue;
        };
        control.clear_errors();

        if entry.errors.is_empty() && watch.is_none() {
            continue;
        }

        match &watch {
            // Highlights what is in the field right now
            Some(watch) if watch.recheck(control) => {}
            _ => control.show_errors(&entry.errors, None),
        }
        marked += 1;
    }

    marked
}
