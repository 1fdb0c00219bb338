//! Class names and attribute values shared with the markup rendered by the
//! block save components. Changing any of these breaks existing forms.

/// Prefix for alert message nodes; the kind is appended (`blockform-alert--danger`).
pub const ALERT_MESSAGE: &str = "blockform-alert";

/// Inline error output attached next to a field.
pub const FIELD_ERROR: &str = "blockform-field-error";

/// `<mark>` wrapping a rejected substring inside a field's error output.
pub const REJECT_MARK: &str = "blockform-reject";

/// Honeypot input. Hidden from people, filled in by bots.
pub const HONEYPOT_NAME: &str = "required_field";
