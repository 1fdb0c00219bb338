pub mod diagnostics;
pub mod error;
pub mod fetch;
pub mod request;
pub mod response;
pub mod scripted;
pub mod transport;

pub use error::GatewayError;
pub use fetch::{FetchGateway, DEFAULT_TIMEOUT};
pub use request::{GatewayRequest, Part, RequestBody};
pub use response::{FieldValidation, SubmissionResult, ValidationData};
pub use scripted::{Scripted, ScriptedTransport};
pub use transport::{HttpTransport, RawResponse, Transport};
