use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::alert::alert_model::{Alert, AlertNode};
use crate::alert::presenter::Presenter;
use crate::form::form_model::{Form, Opacity};
use crate::form::lock::lock_document;

/// Upper bound on a single fade. A presenter that never signals completion
/// must not freeze the form.
pub const DEFAULT_TRANSITION_FALLBACK: Duration = Duration::from_millis(2000);

/// Transient alerts over one form.
///
/// Every show sequence gets a generation number. Starting a sequence cancels
/// the hide timer of the previous one, and a sequence only hides the region
/// while it is still the newest.
pub struct AlertQueue {
    form: Form,
    presenter: Arc<dyn Presenter>,
    fallback: Duration,
    generation: AtomicU64,
    pending_hide: Mutex<Option<CancellationToken>>,
}

impl AlertQueue {
    pub fn new(form: Form, presenter: Arc<dyn Presenter>) -> Self {
        Self {
            form,
            presenter,
            fallback: DEFAULT_TRANSITION_FALLBACK,
            generation: AtomicU64::new(0),
            pending_hide: Mutex::new(None),
        }
    }

    pub fn with_fallback(mut self, fallback: Duration) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    /// Lock the form and fade `alerts` in. The form stays locked.
    pub async fn show(&self, alerts: &[Alert]) {
        self.reveal(alerts).await;
    }

    /// Show `alerts`, keep them up for `wait`, then fade out, empty and hide
    /// the region and unlock the form.
    pub async fn show_then_hide(&self, alerts: &[Alert], wait: Duration) {
        let Some((generation, token)) = self.reveal(alerts).await else {
            return;
        };

        tokio::select! {
            biased;
            _ = token.cancelled() => {
                crate::diag!("hide timer on '{}' superseded", self.form.name());
                return;
            }
            _ = tokio::time::sleep(wait) => {}
        }

        self.conceal(generation).await;
    }

    /// Fade out and hide whatever is currently shown, then unlock.
    pub async fn hide(&self) {
        if !self.has_region() {
            return;
        }
        self.cancel_pending();
        let generation = self.generation.load(Ordering::SeqCst);
        self.conceal(generation).await;
    }

    fn has_region(&self) -> bool {
        self.form.with(|doc| doc.alert_region.is_some())
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    fn cancel_pending(&self) {
        let mut pending = self
            .pending_hide
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.take() {
            previous.cancel();
        }
    }

    /// Start a new sequence. `None` when there is no region or a newer
    /// sequence took over during the fade-in.
    async fn reveal(&self, alerts: &[Alert]) -> Option<(u64, CancellationToken)> {
        if !self.has_region() {
            crate::diag!("form '{}' has no alert region", self.form.name());
            return None;
        }

        let token = CancellationToken::new();
        {
            let mut pending = self
                .pending_hide
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if let Some(previous) = pending.replace(token.clone()) {
                previous.cancel();
            }
        }
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        self.form.with(|doc| {
            lock_document(doc, true);
            if let Some(region) = doc.alert_region.as_mut() {
                region.hidden = false;
                region.nodes.clear();
                region.opacity = Opacity::Opaque;
            }
        });

        self.await_transition(Opacity::Opaque).await;

        if !self.is_current(generation) {
            return None;
        }

        let nodes: Vec<AlertNode> = alerts.iter().map(AlertNode::from).collect();
        let name = self.form.with(|doc| {
            if let Some(region) = doc.alert_region.as_mut() {
                region.nodes = nodes.clone();
            }
            doc.name.clone()
        });
        self.presenter.rendered(&name, &nodes);

        Some((generation, token))
    }

    async fn conceal(&self, generation: u64) {
        if !self.is_current(generation) {
            return;
        }
        self.form.with(|doc| {
            if let Some(region) = doc.alert_region.as_mut() {
                region.opacity = Opacity::Transparent;
            }
        });

        self.await_transition(Opacity::Transparent).await;

        if !self.is_current(generation) {
            return;
        }

        self.form.with(|doc| {
            if let Some(region) = doc.alert_region.as_mut() {
                region.nodes.clear();
                region.hidden = true;
            }
            lock_document(doc, false);
        });
    }

    async fn await_transition(&self, target: Opacity) {
        let name = self.form.name();
        let transition = self.presenter.transition(&name, target);

        if tokio::time::timeout(self.fallback, transition).await.is_err() {
            log::warn!(
                "alert fade to {:?} on '{}' did not finish within {} ms",
                target,
                name,
                self.fallback.as_millis()
            );
        }
    }
}
