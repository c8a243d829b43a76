//! Markdown artifact removal for user-facing text.

use once_cell::sync::Lazy;
use regex::Regex;

static HEADING_MARKERS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^#{1,6}\s+").unwrap());
static EXCESS_ASTERISKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*{3,}").unwrap());
static BULLET_MARKERS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^[-*]\s+").unwrap());
static EXCESS_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());
static EXCESS_SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}").unwrap());

/// Strip markdown artifacts and normalize whitespace for display.
///
/// Idempotent: cleaning already-clean text changes nothing.
pub fn clean_text(text: &str) -> String {
    let text = HEADING_MARKERS.replace_all(text, "");
    let text = EXCESS_ASTERISKS.replace_all(&text, "");
    let text = BULLET_MARKERS.replace_all(&text, "\u{2022} ");
    let text = text.replace("\\n", "\n").replace("\\t", " ").replace('\\', "");
    let text = EXCESS_NEWLINES.replace_all(&text, "\n\n");
    let text = EXCESS_SPACES.replace_all(&text, " ");
    text.trim().to_string()
}

/// Character-safe prefix of `s`, at most `max_chars` long.
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
