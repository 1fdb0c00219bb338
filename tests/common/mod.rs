#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use blockform::alert::alert_model::AlertNode;
use blockform::alert::presenter::{Presenter, TimedPresenter};
use blockform::form::form_model::{Control, FormDocument, Opacity};
use blockform::gateway::scripted::ScriptedTransport;
use blockform::host::inline_config::InlineConfig;
use blockform::host::page::RecordingHost;
use blockform::runtime::{FormRuntime, RuntimeBuilder};
use futures::future::BoxFuture;

pub const TRANSITION: Duration = Duration::from_millis(300);

pub const SETTINGS_JSON: &str = r#"{
    "settingsOK": true,
    "restSubmitURL": "https://example.test/wp-json/blockform/v1/submit",
    "restStoreURL": "https://example.test/wp-json/blockform/v1/store",
    "restTestURL": "https://example.test/wp-json/blockform/v1/test",
    "restNonce": "abc123",
    "debug": false,
    "validationDefinitions": {
        "zip": { "rules": {}, "props": { "pattern": "/^\\d{5}$/" } },
        "plain": { "rules": { "maxLength": 20 }, "props": {} }
    }
}"#;

pub fn settings() -> InlineConfig {
    InlineConfig::from_json(SETTINGS_JSON).unwrap()
}

/// Contact form: name, email (required), message, honeypot, submit button.
pub fn contact_document() -> FormDocument {
    FormDocument::new("contact", "https://example.test/contact")
        .with_record_id("42")
        .with_alert_region()
        .with_control(Control::input("name", "text").with_value("Ada"))
        .with_control(
            Control::input("email", "email")
                .with_id("contact-email")
                .with_value("ada@example.test")
                .required(),
        )
        .with_control(Control::textarea("message").with_value("Hello there"))
        .with_control(Control::honeypot())
        .with_control(Control::button("send"))
}

/// Presenter that records every render and fades in a fixed time.
pub struct RecordingPresenter {
    inner: TimedPresenter,
    pub rendered: Mutex<Vec<Vec<AlertNode>>>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self {
            inner: TimedPresenter::new(TRANSITION),
            rendered: Mutex::new(Vec::new()),
        }
    }

    pub fn renders(&self) -> Vec<Vec<AlertNode>> {
        self.rendered.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<Vec<String>> {
        self.renders()
            .into_iter()
            .map(|nodes| nodes.into_iter().map(|n| n.text).collect())
            .collect()
    }
}

impl Presenter for RecordingPresenter {
    fn transition(&self, form: &str, target: Opacity) -> BoxFuture<'static, ()> {
        self.inner.transition(form, target)
    }

    fn rendered(&self, _form: &str, nodes: &[AlertNode]) {
        self.rendered.lock().unwrap().push(nodes.to_vec());
    }
}

/// Presenter whose transitions never complete.
pub struct StalledPresenter;

impl Presenter for StalledPresenter {
    fn transition(&self, _form: &str, _target: Opacity) -> BoxFuture<'static, ()> {
        Box::pin(futures::future::pending())
    }
}

pub struct Harness {
    pub runtime: FormRuntime,
    pub transport: Arc<ScriptedTransport>,
    pub presenter: Arc<RecordingPresenter>,
    pub host: Arc<RecordingHost>,
}

pub fn builder(
    transport: &Arc<ScriptedTransport>,
    presenter: &Arc<RecordingPresenter>,
    host: &Arc<RecordingHost>,
) -> RuntimeBuilder {
    FormRuntime::builder()
        .config(Some(settings()))
        .transport(transport.clone())
        .presenter(presenter.clone())
        .host(host.clone())
}

pub fn harness(document: FormDocument, transport: ScriptedTransport) -> Harness {
    harness_with(document, transport, |b| b)
}

pub fn harness_with(
    document: FormDocument,
    transport: ScriptedTransport,
    configure: impl FnOnce(RuntimeBuilder) -> RuntimeBuilder,
) -> Harness {
    let transport = Arc::new(transport);
    let presenter = Arc::new(RecordingPresenter::new());
    let host = Arc::new(RecordingHost::new());

    let runtime = configure(builder(&transport, &presenter, &host))
        .build(document)
        .unwrap();

    Harness {
        runtime,
        transport,
        presenter,
        host,
    }
}
