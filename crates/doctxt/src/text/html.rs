//! HTML to plain text.
//!
//! Used for HWP documents that are really HTML or HWPML markup saved under an
//! `.hwp` name. Tags are stripped before entities are decoded, so escaped markup
//! such as `&lt;tag&gt;` survives as the literal text `<tag>`.

use super::normalize::normalize_whitespace;
use once_cell::sync::Lazy;
use regex::Regex;

static SCRIPT_OR_STYLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>")
        .expect("Script/style regex pattern is valid and should compile")
});
static COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("HTML comment regex pattern is valid and should compile"));
static LINE_BREAK_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<br\s*/?>|</?p\b[^>]*>|<h[1-6]\b[^>]*>|</(?:div|tr|li|h[1-6]|table|title)\s*>")
        .expect("Line break tag regex pattern is valid and should compile")
});
static CELL_END_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</t[dh]\s*>").expect("Cell end tag regex pattern is valid and should compile"));
static ANY_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<[A-Za-z/!?][^>]*>").expect("Generic tag regex pattern is valid and should compile")
});

/// Convert an HTML fragment or document to plain text.
pub fn html_to_text(html: &str) -> String {
    let text = SCRIPT_OR_STYLE.replace_all(html, "");
    let text = COMMENT.replace_all(&text, "");
    let text = LINE_BREAK_TAG.replace_all(&text, "\n");
    let text = CELL_END_TAG.replace_all(&text, "\t");
    let text = ANY_TAG.replace_all(&text, "");

    let decoded = html_escape::decode_html_entities(&text);
    let text = decoded.replace('\u{a0}', " ");

    normalize_whitespace(&text)
}

/// Whether `content` looks like markup rather than a binary document.
pub fn looks_like_markup(content: &[u8]) -> bool {
    let trimmed = content.strip_prefix(&[0xEF, 0xBB, 0xBF][..]).unwrap_or(content);
    trimmed
        .iter()
        .find(|byte| !byte.is_ascii_whitespace())
        .is_some_and(|byte| *byte == b'<')
}
