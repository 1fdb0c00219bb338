use serde::{Deserialize, Serialize};

use crate::form::classes::ALERT_MESSAGE;
use crate::util::sanitize::clean_text;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Danger,
    Success,
    Info,
    Warning,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::Danger => "danger",
            AlertKind::Success => "success",
            AlertKind::Info => "info",
            AlertKind::Warning => "warning",
        }
    }

    /// Class carried by the rendered message node.
    pub fn class(&self) -> String {
        format!("{}--{}", ALERT_MESSAGE, self.as_str())
    }
}

/// A short user-facing status message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: AlertKind,
}

impl Alert {
    pub fn new(kind: AlertKind, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }

    pub fn danger(text: impl Into<String>) -> Self {
        Self::new(AlertKind::Danger, text)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(AlertKind::Success, text)
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(AlertKind::Info, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(AlertKind::Warning, text)
    }
}

/// A rendered alert message inside the alert region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertNode {
    pub text: String,
    pub kind: AlertKind,
    pub class: String,
}

impl From<&Alert> for AlertNode {
    fn from(alert: &Alert) -> Self {
        Self {
            text: clean_text(&alert.text),
            kind: alert.kind,
            class: alert.kind.class(),
        }
    }
}
