use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::submission::phase::SubmissionPhase;

/// One JSONL record per submission phase transition.
#[derive(Debug, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    pub form: String,
    pub phase: SubmissionPhase,
    pub elapsed_ms: u128,

    pub detail: Option<String>,
}

impl TraceEvent {
    pub fn now(form: &str, phase: SubmissionPhase, elapsed_ms: u128) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
            form: form.to_string(),
            phase,
            elapsed_ms,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl ToString) -> Self {
        self.detail = Some(detail.to_string());
        self
    }
}
