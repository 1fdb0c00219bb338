use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::alert::presenter::{InstantPresenter, Presenter};
use crate::alert::queue::{AlertQueue, DEFAULT_TRANSITION_FALLBACK};
use crate::attachment::manager::FileAttachmentManager;
use crate::form::form_model::{Form, FormDocument};
use crate::gateway::fetch::{DEFAULT_TIMEOUT, FetchGateway};
use crate::gateway::transport::Transport;
use crate::host::inline_config::{InlineConfig, apply_validation_patterns};
use crate::host::page::PageHost;
use crate::submission::controller::{Endpoint, RESULT_ALERT_WAIT, SubmissionController};
use crate::trace::debug::set_debug;
use crate::trace::logger::TraceLogger;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("inline settings are missing; the form runtime cannot start")]
    MissingConfig,
    #[error("no transport configured")]
    MissingTransport,
    #[error("no page host configured")]
    MissingHost,
}

/// Timing knobs of a form runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeOptions {
    pub request_timeout: Duration,
    pub alert_wait: Duration,
    pub transition_fallback: Duration,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_TIMEOUT,
            alert_wait: RESULT_ALERT_WAIT,
            transition_fallback: DEFAULT_TRANSITION_FALLBACK,
        }
    }
}

/// Everything one form needs at runtime, wired together.
pub struct FormRuntime {
    pub form: Form,
    pub alerts: Arc<AlertQueue>,
    pub attachments: Option<FileAttachmentManager>,
    pub controller: SubmissionController,
}

impl FormRuntime {
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::default()
    }
}

#[derive(Default)]
pub struct RuntimeBuilder {
    config: Option<InlineConfig>,
    presenter: Option<Arc<dyn Presenter>>,
    transport: Option<Arc<dyn Transport>>,
    host: Option<Arc<dyn PageHost>>,
    tracer: Option<Arc<TraceLogger>>,
    options: RuntimeOptions,
    attachments: bool,
}

impl RuntimeBuilder {
    pub fn config(mut self, config: Option<InlineConfig>) -> Self {
        self.config = config;
        self
    }

    pub fn presenter(mut self, presenter: Arc<dyn Presenter>) -> Self {
        self.presenter = Some(presenter);
        self
    }

    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn host(mut self, host: Arc<dyn PageHost>) -> Self {
        self.host = Some(host);
        self
    }

    pub fn tracer(mut self, tracer: Arc<TraceLogger>) -> Self {
        self.tracer = Some(tracer);
        self
    }

    pub fn options(mut self, options: RuntimeOptions) -> Self {
        self.options = options;
        self
    }

    /// Give the form a file upload widget.
    pub fn with_attachments(mut self) -> Self {
        self.attachments = true;
        self
    }

    pub fn build(self, mut document: FormDocument) -> Result<FormRuntime, RuntimeError> {
        let config = self.config.ok_or(RuntimeError::MissingConfig)?;
        let transport = self.transport.ok_or(RuntimeError::MissingTransport)?;
        let host = self.host.ok_or(RuntimeError::MissingHost)?;
        let presenter = self.presenter.unwrap_or_else(|| Arc::new(InstantPresenter));

        set_debug(config.debug);
        if !config.settings_ok {
            log::warn!("plugin settings are incomplete; submissions may be rejected");
        }

        if document.page_url.is_empty() {
            if let Some(url) = host.current_url() {
                document.page_url = url;
            }
        }
        apply_validation_patterns(&mut document, &config);
        let form = Form::new(document);

        let alerts = Arc::new(
            AlertQueue::new(form.clone(), presenter).with_fallback(self.options.transition_fallback),
        );
        let gateway =
            Arc::new(FetchGateway::new(transport).with_timeout(self.options.request_timeout));

        let attachments = self.attachments.then(|| {
            FileAttachmentManager::new(Arc::clone(&alerts)).with_alert_wait(self.options.alert_wait)
        });

        let endpoint = Endpoint {
            url: config.rest_submit_url.clone(),
            nonce: config.rest_nonce.clone(),
        };
        let mut controller =
            SubmissionController::new(Arc::clone(&alerts), gateway, host, endpoint)
                .with_result_wait(self.options.alert_wait);
        if let Some(manager) = &attachments {
            controller = controller.with_attachments(manager.clone());
        }
        if let Some(tracer) = self.tracer {
            controller = controller.with_tracer(tracer);
        }

        Ok(FormRuntime {
            form,
            alerts,
            attachments,
            controller,
        })
    }
}
