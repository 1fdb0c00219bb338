use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::alert::alert_model::Alert;
use crate::alert::queue::AlertQueue;
use crate::attachment::mime::{extension_of, is_allowed_mime, mime_for_path};
use crate::gateway::request::Part;
use crate::util::sanitize::human_size;

/// How long the "file type not allowed" alert stays up.
pub const REJECTION_ALERT_WAIT: Duration = Duration::from_millis(5000);

/// Multipart field carrying each attachment.
pub const FILES_FIELD: &str = "files[]";

#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("could not read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
}

/// A file picked in the upload widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub mime: String,
    pub size: u64,
    pub contents: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: &str, mime: &str, contents: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            mime: mime.to_string(),
            size: contents.len() as u64,
            contents,
        }
    }

    /// Read a file from disk, typing it by extension.
    pub fn from_path(path: &Path) -> Result<Self, AttachmentError> {
        let contents = std::fs::read(path).map_err(|source| AttachmentError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(&name, mime_for_path(path), contents))
    }
}

/// One line of the visible file table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRow {
    /// Bound to exactly one selected file, unique even for equal names
    pub row_id: u64,
    pub name: String,
    pub mime: String,
    pub size: u64,
    pub size_label: String,
    pub allowed: bool,
}

/// Extensions rejected in the current selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DisallowedTypes {
    pub detected: bool,
    /// One entry per rejected file
    pub list: Vec<String>,
}

impl DisallowedTypes {
    /// Alert text naming each rejected extension once.
    pub fn message(&self) -> String {
        let mut unique: Vec<&str> = Vec::new();
        for ext in &self.list {
            if !unique.contains(&ext.as_str()) {
                unique.push(ext);
            }
        }
        format!(
            "File type not allowed: {}. Please remove it before sending.",
            unique.join(", ")
        )
    }
}

#[derive(Debug, Default)]
struct AttachmentState {
    next_row: u64,
    selection: Vec<(u64, SelectedFile)>,
    rows: Vec<FileRow>,
    disallowed: DisallowedTypes,
}

/// State of one file upload widget.
///
/// Cheap to clone; clones share the same selection and rejection state.
#[derive(Clone)]
pub struct FileAttachmentManager {
    state: Arc<Mutex<AttachmentState>>,
    alerts: Arc<AlertQueue>,
    alert_wait: Duration,
}

impl FileAttachmentManager {
    pub fn new(alerts: Arc<AlertQueue>) -> Self {
        Self {
            state: Arc::new(Mutex::new(AttachmentState::default())),
            alerts,
            alert_wait: REJECTION_ALERT_WAIT,
        }
    }

    pub fn with_alert_wait(mut self, wait: Duration) -> Self {
        self.alert_wait = wait;
        self
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut AttachmentState) -> R) -> R {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    /// Replace the selection, as a new pick in the file dialog does.
    pub fn select_files(&self, files: Vec<SelectedFile>) -> Option<JoinHandle<()>> {
        self.with_state(|state| {
            state.selection.clear();
            for file in files {
                state.next_row += 1;
                let row = state.next_row;
                state.selection.push((row, file));
            }
        });
        self.on_files_changed()
    }

    /// Recompute rows and rejection state from the current selection.
    ///
    /// When a file is rejected, the alert runs on a spawned task whose handle
    /// is returned. Must be called inside a Tokio runtime.
    pub fn on_files_changed(&self) -> Option<JoinHandle<()>> {
        let disallowed = self.with_state(|state| {
            state.disallowed = DisallowedTypes::default();
            state.rows.clear();

            for (row_id, file) in &state.selection {
                let allowed = is_allowed_mime(&file.mime);
                if !allowed {
                    state.disallowed.detected = true;
                    state
                        .disallowed
                        .list
                        .push(extension_of(&file.name, &file.mime));
                }

                state.rows.push(FileRow {
                    row_id: *row_id,
                    name: file.name.clone(),
                    mime: file.mime.clone(),
                    size: file.size,
                    size_label: human_size(file.size),
                    allowed,
                });
            }

            state.disallowed.clone()
        });

        crate::diag!(
            "file list rebuilt: {} file(s), {} rejected",
            self.rows().len(),
            disallowed.list.len()
        );

        if !disallowed.detected {
            return None;
        }

        let alerts = Arc::clone(&self.alerts);
        let wait = self.alert_wait;
        let alert = Alert::danger(disallowed.message());
        Some(tokio::spawn(async move {
            alerts.show_then_hide(&[alert], wait).await;
        }))
    }

    /// Drop the file bound to `row_id` and recompute. Unknown rows are
    /// ignored.
    pub fn remove_file(&self, row_id: u64) -> Option<JoinHandle<()>> {
        let removed = self.with_state(|state| {
            let before = state.selection.len();
            state.selection.retain(|(id, _)| *id != row_id);
            state.selection.len() != before
        });

        if !removed {
            log::debug!("no file bound to row {}", row_id);
            return None;
        }
        self.on_files_changed()
    }

    /// Empty the selection and the table.
    pub fn clear(&self) {
        self.with_state(|state| {
            state.selection.clear();
            state.rows.clear();
            state.disallowed = DisallowedTypes::default();
        });
    }

    pub fn rows(&self) -> Vec<FileRow> {
        self.with_state(|state| state.rows.clone())
    }

    pub fn disallowed(&self) -> DisallowedTypes {
        self.with_state(|state| state.disallowed.clone())
    }

    pub fn is_empty(&self) -> bool {
        self.with_state(|state| state.selection.is_empty())
    }

    /// Selected files that pass the allow-list.
    pub fn allowed_files(&self) -> Vec<SelectedFile> {
        self.with_state(|state| {
            state
                .selection
                .iter()
                .filter(|(_, file)| is_allowed_mime(&file.mime))
                .map(|(_, file)| file.clone())
                .collect()
        })
    }

    /// Multipart sections for the allowed part of the selection.
    pub fn file_parts(&self) -> Vec<Part> {
        self.allowed_files()
            .into_iter()
            .map(|file| Part::File {
                name: FILES_FIELD.to_string(),
                file_name: file.name,
                mime: file.mime,
                contents: file.contents,
            })
            .collect()
    }
}
