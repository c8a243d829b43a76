//! Highlight sentence selection.

use once_cell::sync::Lazy;
use regex::Regex;

static SENTENCE_BOUNDARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]\s+").unwrap());

const STRUCTURAL_MARKERS: &[&str] = &[":", "**", "- ", "\u{2022} "];

/// Select the most relevant sentences from a chunk for one query.
///
/// Sentences are scored by term occurrences weighted by term length, with
/// a flat boost for structured lines. Only sentences of display-friendly
/// length (20..300 chars) are eligible. Ties keep original order.
pub fn extract_highlights(
    content: &str,
    query_terms: impl IntoIterator<Item = impl AsRef<str>>,
    max_highlights: usize,
) -> Vec<String> {
    let terms: Vec<String> = query_terms
        .into_iter()
        .map(|t| t.as_ref().to_lowercase())
        .collect();

    let mut scored: Vec<(f32, String)> = Vec::new();
    for sentence in split_into_sentences(content) {
        let sentence_lower = sentence.to_lowercase();
        let mut score = 0.0f32;
        for term in &terms {
            if term.len() > 2 {
                let occurrences = count_occurrences(&sentence_lower, term);
                score += occurrences as f32 * (term.len() as f32 / 3.0);
            }
        }
        if STRUCTURAL_MARKERS.iter().any(|m| sentence.contains(m)) {
            score *= 1.5;
        }
        if sentence.len() > 20 && sentence.len() < 300 {
            scored.push((score, sentence));
        }
    }

    // Stable sort preserves original order among equal scores.
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    scored.into_iter().take(max_highlights).map(|(_, s)| s).collect()
}

/// Split on sentence punctuation followed by whitespace, keeping only
/// substantial sentences and restoring terminal punctuation.
fn split_into_sentences(text: &str) -> Vec<String> {
    SENTENCE_BOUNDARY
        .split(text)
        .filter_map(|raw| {
            let sent = raw.trim();
            if sent.is_empty() || sent.len() <= 10 {
                return None;
            }
            let mut sent = sent.to_string();
            if !sent.ends_with(['.', '!', '?']) {
                sent.push('.');
            }
            Some(sent)
        })
        .collect()
}

fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack.matches(needle).count()
}
