use std::time::Duration;

use futures::future::BoxFuture;

use crate::alert::alert_model::AlertNode;
use crate::form::form_model::Opacity;

/// Presentation layer behind the alert region.
///
/// The queue only needs to know when a fade has finished; how it is drawn is
/// up to the implementation.
pub trait Presenter: Send + Sync {
    /// Resolves once the region of `form` has finished fading to `target`.
    fn transition(&self, form: &str, target: Opacity) -> BoxFuture<'static, ()>;

    /// Alert nodes were inserted into the region of `form`.
    fn rendered(&self, _form: &str, _nodes: &[AlertNode]) {}
}

/// Fades take a fixed time, like a CSS `transition: opacity` rule.
pub struct TimedPresenter {
    pub duration: Duration,
}

impl TimedPresenter {
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }
}

impl Presenter for TimedPresenter {
    fn transition(&self, _form: &str, _target: Opacity) -> BoxFuture<'static, ()> {
        Box::pin(tokio::time::sleep(self.duration))
    }
}

/// No animation at all.
pub struct InstantPresenter;

impl Presenter for InstantPresenter {
    fn transition(&self, _form: &str, _target: Opacity) -> BoxFuture<'static, ()> {
        Box::pin(futures::future::ready(()))
    }
}

/// Prints alerts to the terminal as they appear. Used by the CLI.
pub struct ConsolePresenter {
    pub duration: Duration,
}

impl Presenter for ConsolePresenter {
    fn transition(&self, _form: &str, _target: Opacity) -> BoxFuture<'static, ()> {
        Box::pin(tokio::time::sleep(self.duration))
    }

    fn rendered(&self, form: &str, nodes: &[AlertNode]) {
        for node in nodes {
            println!("[{}] {:>7}: {}", form, node.kind.as_str(), node.text);
        }
    }
}
