use serde_json::Value;

/// One multipart section.
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        mime: String,
        contents: Vec<u8>,
    },
}

impl Part {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Part::Text {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Part::Text { name, .. } | Part::File { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Multipart(Vec<Part>),
    Json(Value),
    Form(Vec<(String, String)>),
}

/// A POST to one of the plugin's REST routes.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayRequest {
    pub url: String,
    /// Sent as `X-WP-Nonce`
    pub nonce: String,
    pub body: RequestBody,
}

impl GatewayRequest {
    pub fn new(url: &str, nonce: &str, body: RequestBody) -> Self {
        Self {
            url: url.to_string(),
            nonce: nonce.to_string(),
            body,
        }
    }

    /// Text value of the multipart section called `name`.
    pub fn text_part(&self, name: &str) -> Option<&str> {
        match &self.body {
            RequestBody::Multipart(parts) => parts.iter().find_map(|p| match p {
                Part::Text { name: n, value } if n == name => Some(value.as_str()),
                _ => None,
            }),
            _ => None,
        }
    }

    pub fn file_parts(&self) -> Vec<&Part> {
        match &self.body {
            RequestBody::Multipart(parts) => parts
                .iter()
                .filter(|p| matches!(p, Part::File { .. }))
                .collect(),
            _ => Vec::new(),
        }
    }
}
