use futures::future::BoxFuture;
use reqwest::{
    Client, ClientBuilder,
    header::{ACCEPT, HeaderName},
    multipart,
};

use crate::gateway::error::GatewayError;
use crate::gateway::request::{GatewayRequest, Part, RequestBody};

const NONCE_HEADER: HeaderName = HeaderName::from_static("x-wp-nonce");

/// Status and body of an HTTP exchange, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// The network primitive under the gateway.
pub trait Transport: Send + Sync {
    fn execute<'a>(
        &'a self,
        request: &'a GatewayRequest,
    ) -> BoxFuture<'a, Result<RawResponse, GatewayError>>;
}

/// reqwest-backed transport.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, GatewayError> {
        let client = ClientBuilder::new().build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

fn build_multipart(parts: &[Part]) -> Result<multipart::Form, GatewayError> {
    let mut form = multipart::Form::new();

    for part in parts {
        form = match part {
            Part::Text { name, value } => form.text(name.clone(), value.clone()),
            Part::File {
                name,
                file_name,
                mime,
                contents,
            } => {
                let file = multipart::Part::bytes(contents.clone())
                    .file_name(file_name.clone())
                    .mime_str(mime)
                    .map_err(|e| {
                        GatewayError::InvalidRequest(format!("{}: {}", file_name, e))
                    })?;
                form.part(name.clone(), file)
            }
        };
    }

    Ok(form)
}

impl Transport for HttpTransport {
    fn execute<'a>(
        &'a self,
        request: &'a GatewayRequest,
    ) -> BoxFuture<'a, Result<RawResponse, GatewayError>> {
        Box::pin(async move {
            let builder = self
                .client
                .post(&request.url)
                .header(NONCE_HEADER, &request.nonce)
                .header(ACCEPT, "application/json");

            let builder = match &request.body {
                RequestBody::Multipart(parts) => builder.multipart(build_multipart(parts)?),
                RequestBody::Json(value) => builder.json(value),
                RequestBody::Form(pairs) => builder.form(pairs),
            };

            let resp = builder.send().await?;
            let status = resp.status().as_u16();
            let body = resp.text().await?;

            Ok(RawResponse { status, body })
        })
    }
}
