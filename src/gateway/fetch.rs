use std::sync::Arc;
use std::time::Duration;

use crate::gateway::request::GatewayRequest;
use crate::gateway::response::{
    CONNECTIVITY_MESSAGE, SubmissionResult, TIMEOUT_MESSAGE, normalize_response,
};
use crate::gateway::transport::Transport;
use crate::trace::debug::Stopwatch;
use crate::util::sanitize::clean_text;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(14_000);

/// Sends requests with a hard timeout and always answers with a
/// [`SubmissionResult`]. Never retries.
pub struct FetchGateway {
    transport: Arc<dyn Transport>,
    timeout: Duration,
}

impl FetchGateway {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn send(&self, request: &GatewayRequest) -> SubmissionResult {
        let watch = Stopwatch::start("fetch");

        // Dropping the transport future on expiry aborts the request
        let result = match tokio::time::timeout(self.timeout, self.transport.execute(request)).await
        {
            Err(_) => {
                log::warn!(
                    "request to {} timed out after {} ms",
                    request.url,
                    self.timeout.as_millis()
                );
                SubmissionResult::failure(TIMEOUT_MESSAGE)
            }
            Ok(Err(e)) => {
                log::warn!("request to {} failed: {}", request.url, e);
                SubmissionResult::failure(CONNECTIVITY_MESSAGE)
            }
            Ok(Ok(raw)) => normalize_response(raw.status, &raw.body),
        };

        watch.lap(&format!("response from {}", request.url));

        if !result.ok {
            for message in &result.output {
                log::warn!("{}", clean_text(message));
            }
        }

        result
    }
}
