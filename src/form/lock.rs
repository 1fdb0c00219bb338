use crate::form::form_model::{Form, FormDocument};

/// Enable or disable every interactive control of the form.
///
/// The control set is resolved on each call, so fields added or removed
/// since the last call are covered. Calling twice with the same state is
/// harmless.
pub fn set_locked(form: &Form, should_lock: bool) {
    form.with(|doc| lock_document(doc, should_lock));
}

pub fn lock_document(doc: &mut FormDocument, should_lock: bool) {
    doc.locked = should_lock;
    for control in &mut doc.controls {
        control.disabled = should_lock;
    }
    crate::diag!(
        "form '{}' {}",
        doc.name,
        if should_lock { "locked" } else { "unlocked" }
    );
}
