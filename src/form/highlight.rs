use std::ops::Range;

use crate::form::classes::REJECT_MARK;

/// A run of a field value, flagged when it belongs to a rejected substring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub rejected: bool,
}

/// Byte ranges of `value` covered by any of `rejects`, sorted and merged.
/// Empty reject strings are ignored.
pub fn reject_ranges(value: &str, rejects: &[String]) -> Vec<Range<usize>> {
    let mut ranges: Vec<Range<usize>> = rejects
        .iter()
        .filter(|r| !r.is_empty())
        .flat_map(|r| {
            value
                .match_indices(r.as_str())
                .map(|(start, m)| start..start + m.len())
        })
        .collect();

    ranges.sort_by_key(|r| (r.start, r.end));

    let mut merged: Vec<Range<usize>> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(last) if range.start <= last.end => {
                last.end = last.end.max(range.end);
            }
            _ => merged.push(range),
        }
    }

    merged
}

/// Split `value` into alternating plain and rejected segments.
pub fn highlight_segments(value: &str, rejects: &[String]) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut cursor = 0;

    for range in reject_ranges(value, rejects) {
        if range.start > cursor {
            segments.push(Segment {
                text: value[cursor..range.start].to_string(),
                rejected: false,
            });
        }
        segments.push(Segment {
            text: value[range.clone()].to_string(),
            rejected: true,
        });
        cursor = range.end;
    }

    if cursor < value.len() {
        segments.push(Segment {
            text: value[cursor..].to_string(),
            rejected: false,
        });
    }

    segments
}

/// Markup for the error output: escaped text with rejected runs in `<mark>`.
pub fn render_highlight(segments: &[Segment]) -> String {
    let mut out = String::new();

    for segment in segments {
        let text = escape_html(&segment.text);
        if segment.rejected {
            out.push_str(&format!("<mark class=\"{}\">{}</mark>", REJECT_MARK, text));
        } else {
            out.push_str(&text);
        }
    }

    out
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
