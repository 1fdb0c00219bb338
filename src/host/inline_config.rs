use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::form::form_model::FormDocument;
use crate::util::pattern::{PatternWarning, RegexLiteral, parse_regex_literal, to_html_pattern};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("inline settings not found")]
    Missing,
    #[error("malformed inline settings: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Server-side rules for one field format, mirrored to the client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationDefinition {
    #[serde(default)]
    pub rules: Map<String, Value>,
    #[serde(default)]
    pub props: Map<String, Value>,
}

impl ValidationDefinition {
    /// `props.pattern`, if the definition carries one.
    pub fn pattern(&self) -> Option<RegexLiteral> {
        self.props
            .get("pattern")
            .and_then(Value::as_str)
            .map(parse_regex_literal)
    }
}

/// Settings the host page inlines before the runtime starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InlineConfig {
    #[serde(rename = "settingsOK", default)]
    pub settings_ok: bool,
    #[serde(rename = "restSubmitURL")]
    pub rest_submit_url: String,
    #[serde(rename = "restStoreURL", default)]
    pub rest_store_url: String,
    #[serde(rename = "restTestURL", default)]
    pub rest_test_url: String,
    #[serde(rename = "restNonce")]
    pub rest_nonce: String,
    #[serde(default)]
    pub debug: bool,
    #[serde(rename = "validationDefinitions", default)]
    pub validation_definitions: BTreeMap<String, ValidationDefinition>,
}

impl InlineConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Accepts either bare JSON or the `var name = {...};` statement emitted
    /// by `wp_localize_script`.
    pub fn from_script(script: &str) -> Result<Self, ConfigError> {
        let start = script.find('{').ok_or(ConfigError::Missing)?;
        let end = script.rfind('}').ok_or(ConfigError::Missing)?;
        if end < start {
            return Err(ConfigError::Missing);
        }
        Self::from_json(&script[start..=end])
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_script(&content)
    }
}

/// Put an HTML `pattern` on every control whose validation definition has
/// one. Returns the translation warnings per field; each is also logged.
pub fn apply_validation_patterns(
    doc: &mut FormDocument,
    config: &InlineConfig,
) -> Vec<(String, PatternWarning)> {
    let mut warnings = Vec::new();

    for control in &mut doc.controls {
        let Some(definition) = control
            .validation_definition
            .as_deref()
            .and_then(|name| config.validation_definitions.get(name))
        else {
            continue;
        };
        let Some(literal) = definition.pattern() else {
            continue;
        };

        let translation = to_html_pattern(&literal);
        for warning in translation.warnings {
            log::warn!("pattern for '{}': {}", control.name, warning);
            warnings.push((control.name.clone(), warning));
        }
        control.pattern = Some(translation.pattern);
    }

    warnings
}
