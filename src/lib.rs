pub mod alert;
pub mod attachment;
pub mod cli;
pub mod form;
pub mod gateway;
pub mod host;
pub mod runtime;
pub mod submission;
pub mod trace;
pub mod util;

pub use alert::{Alert, AlertKind, AlertQueue, Presenter};
pub use attachment::FileAttachmentManager;
pub use form::{Form, FormDocument, set_locked};
pub use gateway::{FetchGateway, HttpTransport, SubmissionResult, Transport};
pub use host::{InlineConfig, PageHost};
pub use runtime::{FormRuntime, RuntimeError, RuntimeOptions};
pub use submission::{SubmissionController, SubmissionOutcome};
