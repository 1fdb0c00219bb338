use serde_json::json;

use crate::gateway::fetch::FetchGateway;
use crate::gateway::request::{GatewayRequest, RequestBody};
use crate::gateway::response::SubmissionResult;
use crate::host::inline_config::InlineConfig;

/// What the admin settings page sends to the test route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticPayload {
    /// Ask the server to send a test mail through its SMTP settings
    Smtp,
    /// Arbitrary test values, form-encoded
    Values(Vec<(String, String)>),
}

impl DiagnosticPayload {
    fn into_body(self) -> RequestBody {
        match self {
            DiagnosticPayload::Smtp => RequestBody::Json(json!({ "test": "SMTP" })),
            DiagnosticPayload::Values(values) => RequestBody::Form(values),
        }
    }
}

/// POST a diagnostic payload to `restTestURL`. Same response contract as a
/// submission.
pub async fn send_diagnostic(
    gateway: &FetchGateway,
    config: &InlineConfig,
    payload: DiagnosticPayload,
) -> SubmissionResult {
    let request = GatewayRequest::new(&config.rest_test_url, &config.rest_nonce, payload.into_body());
    gateway.send(&request).await
}
