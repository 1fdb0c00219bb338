pub mod manager;
pub mod mime;

pub use manager::{AttachmentError, DisallowedTypes, FileAttachmentManager, FileRow, SelectedFile};
pub use mime::{ALLOWED_MIME_TYPES, is_allowed_mime};
