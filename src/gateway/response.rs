use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const TIMEOUT_MESSAGE: &str = "The server took too long to respond. Please try again.";
pub const CONNECTIVITY_MESSAGE: &str =
    "Could not reach the server. Please check your connection and try again.";
const EMPTY_SUCCESS_MESSAGE: &str = "Your submission was received.";
const EMPTY_FAILURE_MESSAGE: &str = "Your submission could not be processed.";

/// Server verdict on one field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValidation {
    #[serde(default)]
    pub errors: Vec<String>,
    /// Literal substrings of the value the server refused
    #[serde(default)]
    pub rejects: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationData {
    #[serde(default)]
    pub has_errors: bool,
    #[serde(default, deserialize_with = "deserialize_fields")]
    pub fields: BTreeMap<String, FieldValidation>,
}

/// PHP encodes an empty associative array as `[]`.
fn deserialize_fields<'de, D>(deserializer: D) -> Result<BTreeMap<String, FieldValidation>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Fields {
        Map(BTreeMap<String, FieldValidation>),
        List(Vec<serde::de::IgnoredAny>),
    }

    Ok(match Fields::deserialize(deserializer)? {
        Fields::Map(map) => map,
        Fields::List(_) => BTreeMap::new(),
    })
}

/// Normalised outcome of a submission request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResult {
    pub ok: bool,
    /// User-facing messages, never empty
    pub output: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ValidationData>,
}

impl SubmissionResult {
    pub fn failure(message: &str) -> Self {
        Self {
            ok: false,
            output: vec![message.to_string()],
            data: None,
        }
    }

    pub fn has_field_errors(&self) -> bool {
        self.data.as_ref().is_some_and(|d| d.has_errors)
    }

    pub fn field(&self, name: &str) -> Option<&FieldValidation> {
        self.data.as_ref().and_then(|d| d.fields.get(name))
    }
}

/// `output` as sent by the server: a bare string or a list.
#[derive(Deserialize)]
#[serde(untagged)]
enum OutputField {
    One(String),
    Many(Vec<Value>),
}

#[derive(Deserialize)]
struct ResponseBody {
    #[serde(default)]
    output: Option<OutputField>,
    /// WordPress core errors (`rest_cookie_invalid_nonce`, ...) carry `message`
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<ValidationData>,
}

/// Build a [`SubmissionResult`] from a decoded HTTP exchange.
///
/// `ok` mirrors the HTTP status. A body that is not a JSON object counts as
/// "no structured response" and yields the connectivity message.
pub fn normalize_response(status: u16, body: &str) -> SubmissionResult {
    let ok = (200..300).contains(&status);

    let parsed: ResponseBody = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(e) => {
            log::warn!("undecodable response (status {}): {}", status, e);
            return SubmissionResult::failure(CONNECTIVITY_MESSAGE);
        }
    };

    let mut output: Vec<String> = match parsed.output {
        Some(OutputField::One(text)) => vec![text],
        Some(OutputField::Many(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::String(text) => text,
                other => other.to_string(),
            })
            .collect(),
        None => parsed.message.into_iter().collect(),
    };

    output.retain(|m| !m.trim().is_empty());
    if output.is_empty() {
        let fallback = if ok {
            EMPTY_SUCCESS_MESSAGE
        } else {
            EMPTY_FAILURE_MESSAGE
        };
        output.push(fallback.to_string());
    }

    SubmissionResult {
        ok,
        output,
        data: parsed.data,
    }
}
