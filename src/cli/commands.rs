use std::path::Path;
use std::sync::Arc;

use serde_json::json;

use crate::alert::presenter::ConsolePresenter;
use crate::attachment::manager::SelectedFile;
use crate::attachment::mime::is_allowed_mime;
use crate::cli::config::{AppConfig, parse_pairs};
use crate::cli::form_spec::FormSpec;
use crate::gateway::diagnostics::{DiagnosticPayload, send_diagnostic};
use crate::gateway::fetch::FetchGateway;
use crate::gateway::scripted::{Scripted, ScriptedTransport};
use crate::gateway::transport::{HttpTransport, Transport};
use crate::host::inline_config::InlineConfig;
use crate::host::page::RecordingHost;
use crate::runtime::FormRuntime;
use crate::submission::controller::SubmissionOutcome;
use crate::trace::logger::TraceLogger;
use crate::util::pattern::{compile_html_pattern, parse_regex_literal, to_html_pattern};
use crate::util::sanitize::human_size;

// ============================================================================
// submit subcommand
// ============================================================================

/// Submit a described form once. Returns whether the server accepted it.
pub async fn cmd_submit(
    settings_path: &str,
    form_path: &str,
    files: &[String],
    trace: Option<&str>,
    dry_run: bool,
    config: &AppConfig,
) -> Result<bool, Box<dyn std::error::Error>> {
    let settings = InlineConfig::load(settings_path)?;
    let spec = FormSpec::from_yaml(&std::fs::read_to_string(form_path)?)?;

    let transport: Arc<dyn Transport> = if dry_run {
        Arc::new(ScriptedTransport::new().with(Scripted::json(
            200,
            json!({ "output": ["Dry run: nothing was sent."] }),
        )))
    } else {
        Arc::new(HttpTransport::new()?)
    };

    let mut builder = FormRuntime::builder()
        .config(Some(settings))
        .transport(transport)
        .host(Arc::new(RecordingHost::new()))
        .presenter(Arc::new(ConsolePresenter {
            duration: config.runtime.transition(),
        }))
        .options(config.runtime.options());

    if let Some(path) = trace.or(config.trace_path.as_deref()) {
        builder = builder.tracer(Arc::new(TraceLogger::new(path)));
    }
    if !files.is_empty() {
        builder = builder.with_attachments();
    }

    let runtime = builder.build(spec.to_document())?;

    if let Some(manager) = &runtime.attachments {
        let selected = files
            .iter()
            .map(|f| SelectedFile::from_path(Path::new(f)))
            .collect::<Result<Vec<_>, _>>()?;
        if let Some(alert) = manager.select_files(selected) {
            alert.await?;
        }
    }

    let outcome = runtime.controller.submit().await;

    match &outcome {
        SubmissionOutcome::Sent { ok, field_errors } => {
            println!("Sent (ok={}, {} field(s) flagged)", ok, field_errors);
            let doc = runtime.form.snapshot();
            for control in &doc.controls {
                if let Some(output) = &control.error_output {
                    for message in &output.messages {
                        println!("  {}: {}", control.name, message);
                    }
                    if let Some(highlight) = &output.highlight {
                        println!("    {}", highlight);
                    }
                }
            }
            Ok(*ok)
        }
        SubmissionOutcome::Invalid(violations) => {
            for v in violations {
                println!("  {}: {}", v.field, v.violation.message());
            }
            Ok(false)
        }
        SubmissionOutcome::BlockedAttachments(disallowed) => {
            println!("{}", disallowed.message());
            Ok(false)
        }
        SubmissionOutcome::BotDetected => {
            println!("Honeypot filled in; submission dropped");
            Ok(false)
        }
        SubmissionOutcome::Aborted(reason) => {
            eprintln!("Submission aborted: {}", reason);
            Ok(false)
        }
    }
}

// ============================================================================
// test-mail subcommand
// ============================================================================

pub async fn cmd_test_mail(
    settings_path: &str,
    values: &[String],
    config: &AppConfig,
) -> Result<bool, Box<dyn std::error::Error>> {
    let settings = InlineConfig::load(settings_path)?;
    if settings.rest_test_url.is_empty() {
        return Err("settings carry no restTestURL".into());
    }

    let gateway = FetchGateway::new(Arc::new(HttpTransport::new()?))
        .with_timeout(config.runtime.options().request_timeout);
    let payload = if values.is_empty() {
        DiagnosticPayload::Smtp
    } else {
        DiagnosticPayload::Values(parse_pairs(values))
    };

    let result = send_diagnostic(&gateway, &settings, payload).await;
    for line in &result.output {
        println!("{}", line);
    }

    Ok(result.ok)
}

// ============================================================================
// pattern subcommand
// ============================================================================

pub fn cmd_pattern(regex: &str) -> Result<(), Box<dyn std::error::Error>> {
    let literal = parse_regex_literal(regex);
    let translation = to_html_pattern(&literal);

    println!("pattern=\"{}\"", translation.pattern);
    for warning in &translation.warnings {
        println!("  warning: {}", warning);
    }
    if compile_html_pattern(&translation.pattern).is_none() {
        return Err(format!("'{}' does not compile", translation.pattern).into());
    }

    Ok(())
}

// ============================================================================
// check-files subcommand
// ============================================================================

/// Classify files the way the upload widget would. Returns whether all of
/// them are allowed.
pub fn cmd_check_files(paths: &[String]) -> Result<bool, Box<dyn std::error::Error>> {
    let mut all_allowed = true;

    for path in paths {
        let file = SelectedFile::from_path(Path::new(path))?;
        let allowed = is_allowed_mime(&file.mime);
        all_allowed &= allowed;
        println!(
            "{} {} ({}, {})",
            if allowed { "ok  " } else { "DENY" },
            file.name,
            file.mime,
            human_size(file.size)
        );
    }

    Ok(all_allowed)
}
