//! Regex helpers for validation definitions.
//!
//! Validation rules arrive from the server as JavaScript-style regex literals
//! (`/^[a-z]+$/i`). The browser only understands an anchored, flag-less
//! `pattern` attribute, so translation is lossy. Every loss is reported as a
//! [`PatternWarning`] instead of being silently dropped. Single-line patterns
//! only.

use std::fmt;

use regex::Regex;

const KNOWN_FLAGS: &str = "dgimsuyv";

/// A regex split into its body and trailing flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegexLiteral {
    pub pattern: String,
    pub flags: String,
}

/// Result of translating a [`RegexLiteral`] into an HTML `pattern` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternTranslation {
    pub pattern: String,
    pub warnings: Vec<PatternWarning>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternWarning {
    /// Flag with no `pattern` equivalent (`i`, `m`, `s`, ...)
    IgnoredFlag(char),
    /// `^`/`$` removed; `pattern` is always anchored
    AnchorStripped,
    /// Pattern spans several lines
    Multiline,
    /// Construct the browser may reject
    UnsupportedConstruct(&'static str),
    /// The server-side engine can't compile it either
    NotPortable(String),
}

impl fmt::Display for PatternWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternWarning::IgnoredFlag(flag) => {
                write!(f, "flag '{}' has no effect in a pattern attribute", flag)
            }
            PatternWarning::AnchorStripped => {
                write!(f, "anchors removed, pattern attributes are implicitly anchored")
            }
            PatternWarning::Multiline => write!(f, "multi-line patterns are not supported"),
            PatternWarning::UnsupportedConstruct(what) => {
                write!(f, "unsupported construct: {}", what)
            }
            PatternWarning::NotPortable(reason) => {
                write!(f, "pattern is not portable: {}", reason)
            }
        }
    }
}

/// Escape every regex metacharacter in `text`.
pub fn escape_regex(text: &str) -> String {
    regex::escape(text)
}

/// Reverse of [`escape_regex`]: drop a backslash in front of any
/// non-alphanumeric character. Escapes such as `\d` are kept as-is.
pub fn unescape_regex(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.peek() {
                Some(next) if !next.is_alphanumeric() => {
                    out.push(*next);
                    chars.next();
                }
                _ => out.push(c),
            }
        } else {
            out.push(c);
        }
    }

    out
}

/// Split `/body/flags` into its parts. Anything that is not a well-formed
/// literal is taken as a bare pattern without flags.
pub fn parse_regex_literal(raw: &str) -> RegexLiteral {
    let raw = raw.trim();

    if let Some(rest) = raw.strip_prefix('/') {
        if let Some(end) = rest.rfind('/') {
            let flags = &rest[end + 1..];
            if flags.chars().all(|c| KNOWN_FLAGS.contains(c)) {
                return RegexLiteral {
                    pattern: rest[..end].to_string(),
                    flags: flags.to_string(),
                };
            }
        }
    }

    RegexLiteral {
        pattern: raw.to_string(),
        flags: String::new(),
    }
}

/// Translate a literal into a value usable as an HTML `pattern` attribute.
pub fn to_html_pattern(literal: &RegexLiteral) -> PatternTranslation {
    let mut warnings = Vec::new();

    for flag in literal.flags.chars() {
        match flag {
            // Unicode modes are what the browser compiles `pattern` with anyway
            'u' | 'v' => {}
            // Global/sticky only matter for repeated exec()
            'g' | 'y' | 'd' => {}
            other => warnings.push(PatternWarning::IgnoredFlag(other)),
        }
    }

    let mut pattern = literal.pattern.as_str();

    if pattern.contains('\n') || pattern.contains('\r') {
        warnings.push(PatternWarning::Multiline);
    }

    let mut stripped = false;
    if let Some(rest) = pattern.strip_prefix('^') {
        pattern = rest;
        stripped = true;
    }
    if pattern.ends_with('$') && !pattern.ends_with("\\$") {
        pattern = &pattern[..pattern.len() - 1];
        stripped = true;
    }
    if stripped {
        warnings.push(PatternWarning::AnchorStripped);
    }

    if pattern.contains("(?<=") || pattern.contains("(?<!") {
        warnings.push(PatternWarning::UnsupportedConstruct("lookbehind"));
    }
    if pattern.contains("(?=") || pattern.contains("(?!") {
        warnings.push(PatternWarning::UnsupportedConstruct("lookahead"));
    }

    if let Err(e) = Regex::new(pattern) {
        warnings.push(PatternWarning::NotPortable(
            e.to_string().lines().last().unwrap_or_default().trim().to_string(),
        ));
    }

    PatternTranslation {
        pattern: pattern.to_string(),
        warnings,
    }
}

/// Compile a `pattern` attribute the way a browser applies it: the whole
/// value must match. `None` if the engine can't compile it.
pub fn compile_html_pattern(pattern: &str) -> Option<Regex> {
    Regex::new(&format!("^(?:{})$", pattern)).ok()
}
