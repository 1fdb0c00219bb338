pub mod classes;
pub mod constraints;
pub mod form_model;
pub mod highlight;
pub mod lock;

pub use form_model::{AlertRegion, Control, ControlTag, ErrorOutput, FieldWatch, Form, FormDocument, Opacity};
pub use lock::set_locked;
