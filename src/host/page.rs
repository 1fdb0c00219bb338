use std::sync::{Mutex, PoisonError};

/// Page-level side effects the runtime may trigger.
pub trait PageHost: Send + Sync {
    /// Tear the document down and navigate to `redirect_to`. Only used when
    /// the honeypot is filled in; there is no way back.
    fn terminate_session(&self, redirect_to: &str);

    /// URL of the page the form is rendered on, if the host knows it.
    fn current_url(&self) -> Option<String> {
        None
    }
}

/// Remembers the termination instead of performing it.
#[derive(Debug, Default)]
pub struct RecordingHost {
    url: Option<String>,
    terminated: Mutex<Option<String>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(url: &str) -> Self {
        Self {
            url: Some(url.to_string()),
            ..Self::default()
        }
    }

    /// Redirect target, once the session was terminated.
    pub fn terminated(&self) -> Option<String> {
        self.terminated
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl PageHost for RecordingHost {
    fn terminate_session(&self, redirect_to: &str) {
        log::warn!("session terminated, redirecting to {}", redirect_to);
        *self
            .terminated
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(redirect_to.to_string());
    }

    fn current_url(&self) -> Option<String> {
        self.url.clone()
    }
}
