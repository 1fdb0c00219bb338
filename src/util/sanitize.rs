use std::sync::LazyLock;

use regex::Regex;

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("static regex"));

/// Turn server or transport text into something fit for an alert.
///
/// Strips markup, decodes the handful of entities WordPress emits in REST
/// messages and collapses whitespace. Best effort only: no full HTML parsing.
pub fn clean_text(raw: &str) -> String {
    let stripped = TAG.replace_all(raw, " ");

    let decoded = stripped
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#039;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&");

    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Slug a human label into a `name` attribute: lowercase ASCII alphanumerics
/// joined by single underscores.
pub fn slugify_name(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut pending_sep = false;

    for c in label.trim().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
            pending_sep = false;
        } else {
            pending_sep = true;
        }
    }

    out
}

/// SHA-1 hex digest of `text`, used to derive stable element ids.
pub fn text_fingerprint(text: &str) -> String {
    use sha1::{Digest, Sha1};

    let mut hasher = Sha1::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Render a byte count the way the file table shows it ("512 B", "1.5 KB").
pub fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{:.1} {}", value, UNITS[unit])
}
