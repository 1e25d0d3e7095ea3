//! Best-effort input scrubbing applied before validation and before a
//! submission leaves the process. Not a replacement for output encoding.

use once_cell::sync::Lazy;
use regex::Regex;

/// Hard cap on sanitized input, in characters.
pub const MAX_INPUT_CHARS: usize = 2000;

static SCRIPT_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").expect("script pattern compiles")
});

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("tag pattern compiles"));

static JS_PROTOCOL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)javascript:").expect("protocol pattern compiles"));

static EVENT_HANDLER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\s*on\w+\s*=\s*["'][^"']*["']"#).expect("handler pattern compiles")
});

/// Trims, strips script blocks, tags, `javascript:` prefixes and inline
/// event handlers, then truncates to [`MAX_INPUT_CHARS`].
///
/// Script blocks go first so their body is removed along with the tags.
pub fn sanitize(input: &str) -> String {
    let trimmed = input.trim();
    let without_scripts = SCRIPT_BLOCK.replace_all(trimmed, "");
    let without_tags = HTML_TAG.replace_all(&without_scripts, "");
    let without_protocol = JS_PROTOCOL.replace_all(&without_tags, "");
    let without_handlers = EVENT_HANDLER.replace_all(&without_protocol, "");

    without_handlers.chars().take(MAX_INPUT_CHARS).collect()
}

/// Missing input sanitizes to the empty string.
pub fn sanitize_opt(input: Option<&str>) -> String {
    input.map(sanitize).unwrap_or_default()
}
