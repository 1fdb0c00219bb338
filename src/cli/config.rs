use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::runtime::RuntimeOptions;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "blockform",
    version,
    about = "Submit block-editor forms and exercise their REST routes from the terminal"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: blockform.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Submit a form described in YAML
    Submit {
        /// Inline settings JSON (or the `var x = {...};` script) from the page
        #[arg(long)]
        settings: String,

        /// Form description YAML
        #[arg(long)]
        form: String,

        /// File to attach (repeatable)
        #[arg(long = "file")]
        files: Vec<String>,

        /// Append submission traces to this JSONL file
        #[arg(long)]
        trace: Option<String>,

        /// Build the request but answer it locally instead of sending it
        #[arg(long)]
        dry_run: bool,
    },

    /// Send a diagnostic request to the settings test route
    TestMail {
        /// Inline settings JSON
        #[arg(long)]
        settings: String,

        /// key=value pair to send instead of the SMTP test (repeatable)
        #[arg(long = "value")]
        values: Vec<String>,
    },

    /// Translate a regex literal into an HTML pattern attribute
    Pattern {
        /// Regex literal, e.g. "/^[a-z]+$/i"
        regex: String,
    },

    /// Classify files against the attachment allow-list
    CheckFiles {
        /// Files to check
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `blockform.yaml`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub runtime: RuntimeConfig,

    pub trace_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_alert_wait_ms")]
    pub alert_wait_ms: u64,

    #[serde(default = "default_transition_ms")]
    pub transition_ms: u64,

    #[serde(default = "default_fallback_ms")]
    pub transition_fallback_ms: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 14_000,
            alert_wait_ms: 5_000,
            transition_ms: 300,
            transition_fallback_ms: 2_000,
        }
    }
}

impl RuntimeConfig {
    pub fn options(&self) -> RuntimeOptions {
        RuntimeOptions {
            request_timeout: Duration::from_millis(self.timeout_ms),
            alert_wait: Duration::from_millis(self.alert_wait_ms),
            transition_fallback: Duration::from_millis(self.transition_fallback_ms),
        }
    }

    pub fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }
}

// Serde default helpers
fn default_timeout_ms() -> u64 { 14_000 }
fn default_alert_wait_ms() -> u64 { 5_000 }
fn default_transition_ms() -> u64 { 300 }
fn default_fallback_ms() -> u64 { 2_000 }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("blockform.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_else(|e| {
            log::warn!("ignoring malformed {}: {}", config_path, e);
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

/// Split `key=value` arguments. Entries without `=` get an empty value.
pub fn parse_pairs(raw: &[String]) -> Vec<(String, String)> {
    raw.iter()
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (k.trim().to_string(), v.to_string()),
            None => (pair.trim().to_string(), String::new()),
        })
        .collect()
}
