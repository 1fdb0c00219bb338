use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use thiserror::Error;

use crate::alert::alert_model::{Alert, AlertKind};
use crate::alert::queue::AlertQueue;
use crate::attachment::manager::{DisallowedTypes, FileAttachmentManager};
use crate::form::constraints::{ConstraintViolation, check_constraints};
use crate::form::form_model::Form;
use crate::form::lock::set_locked;
use crate::gateway::fetch::FetchGateway;
use crate::gateway::request::{GatewayRequest, RequestBody};
use crate::host::page::PageHost;
use crate::submission::payload::collect_fields;
use crate::submission::phase::SubmissionPhase;
use crate::submission::reconcile::{clear_stale_errors, mark_violations, reconcile};
use crate::trace::debug::Stopwatch;
use crate::trace::logger::TraceLogger;
use crate::trace::trace::TraceEvent;

pub const CONNECTING_MESSAGE: &str = "Connecting...";
pub const UNEXPECTED_MESSAGE: &str = "Something went wrong while sending the form. Please try again.";
/// How long the final success/failure alerts stay up.
pub const RESULT_ALERT_WAIT: Duration = Duration::from_millis(5000);
pub const BOT_REDIRECT_URL: &str = "about:blank";

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("could not encode form data: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("submission cycle panicked: {0}")]
    Panicked(String),
}

/// How a submission attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The request went out and the server answered (or the gateway failed)
    Sent { ok: bool, field_errors: usize },
    /// Required or pattern constraints failed; nothing was sent
    Invalid(Vec<ConstraintViolation>),
    /// The upload widget holds rejected files; nothing was sent
    BlockedAttachments(DisallowedTypes),
    /// Honeypot filled in; the session was terminated
    BotDetected,
    /// Unexpected failure inside the cycle
    Aborted(String),
}

/// Submit route and nonce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub url: String,
    pub nonce: String,
}

/// Drives one form's submit lifecycle.
pub struct SubmissionController {
    form: Form,
    alerts: Arc<AlertQueue>,
    gateway: Arc<FetchGateway>,
    host: Arc<dyn PageHost>,
    endpoint: Endpoint,
    attachments: Option<FileAttachmentManager>,
    tracer: Arc<TraceLogger>,
    result_wait: Duration,
    bot_redirect: String,
}

impl SubmissionController {
    pub fn new(
        alerts: Arc<AlertQueue>,
        gateway: Arc<FetchGateway>,
        host: Arc<dyn PageHost>,
        endpoint: Endpoint,
    ) -> Self {
        Self {
            form: alerts.form().clone(),
            alerts,
            gateway,
            host,
            endpoint,
            attachments: None,
            tracer: Arc::new(TraceLogger::disabled()),
            result_wait: RESULT_ALERT_WAIT,
            bot_redirect: BOT_REDIRECT_URL.to_string(),
        }
    }

    pub fn with_attachments(mut self, attachments: FileAttachmentManager) -> Self {
        self.attachments = Some(attachments);
        self
    }

    pub fn with_tracer(mut self, tracer: Arc<TraceLogger>) -> Self {
        self.tracer = tracer;
        self
    }

    pub fn with_result_wait(mut self, wait: Duration) -> Self {
        self.result_wait = wait;
        self
    }

    pub fn with_bot_redirect(mut self, url: &str) -> Self {
        self.bot_redirect = url.to_string();
        self
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    /// Handle a submit event. Never fails: every error ends as a danger alert
    /// with the form unlocked.
    pub async fn submit(&self) -> SubmissionOutcome {
        let watch = Stopwatch::start(format!("submit:{}", self.form.name()));

        let cycle = AssertUnwindSafe(self.run_cycle(&watch)).catch_unwind().await;
        let outcome = match cycle {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(e)) => self.recover(e).await,
            Err(panic) => self.recover(SubmissionError::Panicked(panic_message(panic))).await,
        };

        self.trace(SubmissionPhase::Idle, &watch, Some(format!("{:?}", outcome)));
        outcome
    }

    async fn run_cycle(&self, watch: &Stopwatch) -> Result<SubmissionOutcome, SubmissionError> {
        // Native constraint validation runs before the submit event
        let violations = self.form.with(|doc| {
            clear_stale_errors(doc);
            let violations = check_constraints(doc);
            mark_violations(doc, &violations);
            violations
        });
        if !violations.is_empty() {
            // An empty required field never shields a filled honeypot
            if self.form.with(|doc| collect_fields(doc)).honeypot_filled() {
                self.trace(SubmissionPhase::BotCheck, watch, None);
                return Ok(self.drop_bot());
            }
            return Ok(SubmissionOutcome::Invalid(violations));
        }

        self.trace(SubmissionPhase::Collecting, watch, None);
        let collected = self.form.with(|doc| collect_fields(doc));

        if let Some(attachments) = &self.attachments {
            let disallowed = attachments.disallowed();
            if disallowed.detected {
                self.alerts
                    .show_then_hide(&[Alert::danger(disallowed.message())], self.result_wait)
                    .await;
                return Ok(SubmissionOutcome::BlockedAttachments(disallowed));
            }
        }

        self.trace(SubmissionPhase::BotCheck, watch, None);
        if collected.honeypot_filled() {
            return Ok(self.drop_bot());
        }

        self.trace(SubmissionPhase::AwaitingFetch, watch, None);
        let submitted = collected.field_names();
        let files = self
            .attachments
            .as_ref()
            .map(FileAttachmentManager::file_parts)
            .unwrap_or_default();
        let request = GatewayRequest::new(
            &self.endpoint.url,
            &self.endpoint.nonce,
            RequestBody::Multipart(collected.into_parts(files)?),
        );

        let connecting = [Alert::info(CONNECTING_MESSAGE)];
        let (result, ()) = tokio::join!(self.gateway.send(&request), self.alerts.show(&connecting));

        self.trace(
            SubmissionPhase::Reconciling,
            watch,
            Some(format!("ok={} has_errors={}", result.ok, result.has_field_errors())),
        );
        let field_errors = if result.has_field_errors() {
            self.form.with(|doc| reconcile(doc, &submitted, &result))
        } else {
            0
        };

        self.trace(SubmissionPhase::Settling, watch, None);
        let kind = if result.ok {
            AlertKind::Success
        } else {
            AlertKind::Danger
        };
        let alerts: Vec<Alert> = result
            .output
            .iter()
            .map(|message| Alert::new(kind, message.clone()))
            .collect();

        if result.ok {
            self.reset_form();
        }
        self.alerts.show_then_hide(&alerts, self.result_wait).await;

        Ok(SubmissionOutcome::Sent {
            ok: result.ok,
            field_errors,
        })
    }

    fn drop_bot(&self) -> SubmissionOutcome {
        log::warn!("honeypot filled on '{}'", self.form.name());
        self.host.terminate_session(&self.bot_redirect);
        SubmissionOutcome::BotDetected
    }

    /// Clear values, inline errors and the attachment table.
    pub fn reset_form(&self) {
        self.form.reset();
        if let Some(attachments) = &self.attachments {
            attachments.clear();
        }
    }

    async fn recover(&self, error: SubmissionError) -> SubmissionOutcome {
        log::error!("submission of '{}' failed: {}", self.form.name(), error);

        self.alerts
            .show_then_hide(&[Alert::danger(UNEXPECTED_MESSAGE)], self.result_wait)
            .await;
        // No alert region means nothing above unlocked the form
        set_locked(&self.form, false);

        SubmissionOutcome::Aborted(error.to_string())
    }

    fn trace(&self, phase: SubmissionPhase, watch: &Stopwatch, detail: Option<String>) {
        let elapsed = watch.lap(&format!("{:?}", phase));
        if !self.tracer.is_enabled() {
            return;
        }

        let mut event = TraceEvent::now(&self.form.name(), phase, elapsed);
        if let Some(detail) = detail {
            event = event.with_detail(detail);
        }
        self.tracer.log(&event);
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
