use std::time::Duration;

use blockform::trace::debug::{Stopwatch, debug_enabled, set_debug};
use blockform::util::pattern::{
    PatternWarning, RegexLiteral, compile_html_pattern, escape_regex, parse_regex_literal,
    to_html_pattern, unescape_regex,
};
use blockform::util::sanitize::{clean_text, human_size, slugify_name, text_fingerprint};

// =========================================================================
// Text cleanup
// =========================================================================

#[test]
fn clean_text_strips_markup_and_entities() {
    assert_eq!(clean_text("<p>Thanks,&nbsp;<b>Ada</b>!</p>"), "Thanks, Ada !");
    assert_eq!(clean_text("Tom &amp; Jerry"), "Tom & Jerry");
    assert_eq!(clean_text("It&#039;s &quot;done&quot;"), "It's \"done\"");
    assert_eq!(clean_text("  spread \n\t out  "), "spread out");
    assert_eq!(clean_text(""), "");
}

#[test]
fn slugify_name_builds_attribute_safe_names() {
    assert_eq!(slugify_name("Your E-mail"), "your_e_mail");
    assert_eq!(slugify_name("  First   Name "), "first_name");
    assert_eq!(slugify_name("--Phone #--"), "phone");
    assert_eq!(slugify_name("!!!"), "");
}

#[test]
fn text_fingerprint_is_sha1_hex() {
    assert_eq!(
        text_fingerprint("abc"),
        "a9993e364706816aba3e25717850c26c9cd0d89d"
    );
    assert_eq!(text_fingerprint("email"), text_fingerprint("email"));
    assert_ne!(text_fingerprint("email"), text_fingerprint("Email"));
}

#[test]
fn human_size_picks_a_unit() {
    assert_eq!(human_size(0), "0 B");
    assert_eq!(human_size(512), "512 B");
    assert_eq!(human_size(1536), "1.5 KB");
    assert_eq!(human_size(1024 * 1024), "1.0 MB");
    assert_eq!(human_size(5 * 1024 * 1024 * 1024), "5.0 GB");
}

// =========================================================================
// Regex helpers
// =========================================================================

#[test]
fn escape_and_unescape_are_inverse_for_literals() {
    let raw = "1+1=2? (yes) [a.b]";
    let escaped = escape_regex(raw);
    assert!(escaped.contains("\\+"));
    assert!(escaped.contains("\\("));
    assert_eq!(unescape_regex(&escaped), raw);
}

#[test]
fn unescape_keeps_character_classes() {
    assert_eq!(unescape_regex(r"\d+\.\d+"), r"\d+.\d+");
}

#[test]
fn parse_regex_literal_splits_flags() {
    assert_eq!(
        parse_regex_literal("/^[a-z]+$/iu"),
        RegexLiteral {
            pattern: "^[a-z]+$".into(),
            flags: "iu".into(),
        }
    );
    // A slash inside the body does not end it early
    assert_eq!(parse_regex_literal("/a\\/b/").pattern, "a\\/b");
}

#[test]
fn parse_regex_literal_falls_back_to_bare_pattern() {
    let literal = parse_regex_literal("[0-9]{3}");
    assert_eq!(literal.pattern, "[0-9]{3}");
    assert!(literal.flags.is_empty());

    // Unknown flag letters mean it wasn't a literal after all
    let literal = parse_regex_literal("/path/to/file");
    assert_eq!(literal.pattern, "/path/to/file");
}

#[test]
fn to_html_pattern_reports_losses() {
    let translation = to_html_pattern(&parse_regex_literal("/^[a-z]+$/i"));
    assert_eq!(translation.pattern, "[a-z]+");
    assert!(translation.warnings.contains(&PatternWarning::IgnoredFlag('i')));
    assert!(translation.warnings.contains(&PatternWarning::AnchorStripped));

    let translation = to_html_pattern(&parse_regex_literal("/\\d{5}/u"));
    assert_eq!(translation.pattern, "\\d{5}");
    assert!(translation.warnings.is_empty());
}

#[test]
fn to_html_pattern_flags_lookaround() {
    let translation = to_html_pattern(&parse_regex_literal("(?=.*\\d).{8,}"));
    assert!(
        translation
            .warnings
            .contains(&PatternWarning::UnsupportedConstruct("lookahead"))
    );
    assert!(
        translation
            .warnings
            .iter()
            .any(|w| matches!(w, PatternWarning::NotPortable(_)))
    );
}

#[test]
fn escaped_dollar_is_not_an_anchor() {
    let translation = to_html_pattern(&parse_regex_literal("price\\$"));
    assert_eq!(translation.pattern, "price\\$");
    assert!(!translation.warnings.contains(&PatternWarning::AnchorStripped));
}

#[test]
fn compiled_pattern_must_match_whole_value() {
    let re = compile_html_pattern("\\d{3}").unwrap();
    assert!(re.is_match("123"));
    assert!(!re.is_match("1234"));
    assert!(!re.is_match("a123"));

    let re = compile_html_pattern("cat|dog").unwrap();
    assert!(re.is_match("dog"));
    assert!(!re.is_match("catdog"));

    assert!(compile_html_pattern("(").is_none());
}

// =========================================================================
// Debug toggle and stopwatch
// =========================================================================

#[test]
fn debug_toggle_round_trips() {
    set_debug(true);
    assert!(debug_enabled());
    set_debug(false);
    assert!(!debug_enabled());
}

#[test]
fn stopwatch_laps_report_elapsed_time() {
    let watch = Stopwatch::start("upload");
    std::thread::sleep(Duration::from_millis(20));

    let first = watch.lap("halfway");
    assert!(first >= 20);
    assert!(watch.lap("done") >= first);
}
