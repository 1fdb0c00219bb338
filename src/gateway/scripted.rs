use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use futures::future::BoxFuture;
use serde_json::Value;

use crate::gateway::error::GatewayError;
use crate::gateway::request::GatewayRequest;
use crate::gateway::transport::{RawResponse, Transport};

/// One canned reaction of a [`ScriptedTransport`].
#[derive(Debug, Clone)]
pub enum Scripted {
    Respond {
        status: u16,
        body: String,
        delay: Duration,
    },
    Fail(String),
    /// Never answers
    Hang,
}

impl Scripted {
    pub fn json(status: u16, body: Value) -> Self {
        Scripted::Respond {
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn after(self, delay: Duration) -> Self {
        match self {
            Scripted::Respond { status, body, .. } => Scripted::Respond {
                status,
                body,
                delay,
            },
            other => other,
        }
    }
}

/// Transport that plays back a script and records every request.
/// For tests and dry runs without a server.
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<GatewayRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, step: Scripted) -> Self {
        self.push(step);
        self
    }

    pub fn push(&self, step: Scripted) {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(step);
    }

    pub fn calls(&self) -> Vec<GatewayRequest> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl Transport for ScriptedTransport {
    fn execute<'a>(
        &'a self,
        request: &'a GatewayRequest,
    ) -> BoxFuture<'a, Result<RawResponse, GatewayError>> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
        let step = self
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();

        Box::pin(async move {
            match step {
                Some(Scripted::Respond {
                    status,
                    body,
                    delay,
                }) => {
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    Ok(RawResponse { status, body })
                }
                Some(Scripted::Fail(reason)) => Err(GatewayError::Connect(reason)),
                Some(Scripted::Hang) => futures::future::pending().await,
                None => Err(GatewayError::Connect("no scripted response left".into())),
            }
        })
    }
}
