//! Per-hit display formatting under a character budget.

use docqa_core::types::{QueryAnalysis, QueryType, SearchHit};

use crate::clean::{clean_text, truncate_chars};
use crate::structured::extract_structured_content;

const VALUE_DISPLAY_CHARS: usize = 100;
const EXCERPT_CHARS: usize = 500;

/// Format one hit for the final message, never exceeding `max_length`
/// characters.
///
/// Technology queries favour structured data (key/values, then the first
/// short list); everything else leads with highlights plus key/values
/// whose keys mention a query term. Falls back to a cleaned excerpt when
/// nothing structured was produced.
pub fn format_for_display(
    hit: &SearchHit,
    query_analysis: &QueryAnalysis,
    max_length: usize,
) -> String {
    let mut parts: Vec<String> = Vec::new();

    let clean_content = clean_text(&hit.content);

    if !hit.section_title.is_empty() {
        let clean_title = clean_text(&hit.section_title);
        parts.push(format!("**{clean_title}**\n"));
    }

    let structured = extract_structured_content(&clean_content);

    if query_analysis.query_type == QueryType::Technology {
        for (key, value) in structured.key_values.iter().take(4) {
            let clean_key = clean_text(key);
            let clean_value = truncate_chars(&clean_text(value), VALUE_DISPLAY_CHARS);
            parts.push(format!("{clean_key}: {clean_value}"));
        }
        if let Some(first_list) = structured.lists.first() {
            if first_list.len() <= 5 {
                for item in first_list.iter().take(3) {
                    let clean_item = truncate_chars(&clean_text(item), VALUE_DISPLAY_CHARS);
                    parts.push(format!("\u{2022} {clean_item}"));
                }
            }
        }
    } else {
        for highlight in hit.highlights.iter().take(3) {
            let clean_highlight = clean_text(highlight);
            parts.push(format!("\u{2022} {clean_highlight}"));
        }

        let relevant: Vec<String> = structured
            .key_values
            .iter()
            .filter(|(key, _)| {
                let key_lower = key.to_lowercase();
                query_analysis
                    .key_terms
                    .iter()
                    .any(|term| term.len() > 2 && key_lower.contains(term.as_str()))
            })
            .map(|(key, value)| {
                let clean_key = clean_text(key);
                let clean_value = truncate_chars(&clean_text(value), VALUE_DISPLAY_CHARS);
                format!("{clean_key}: {clean_value}")
            })
            .collect();
        parts.extend(relevant.into_iter().take(2));
    }

    // Nothing beyond the section header: use a plain excerpt instead.
    if parts.len() <= 1 {
        let mut excerpt = truncate_chars(&clean_content, EXCERPT_CHARS);
        if excerpt.chars().count() < clean_content.chars().count() {
            excerpt.push_str("...");
        }
        parts.push(excerpt);
    }

    let result = parts.join("\n");
    if result.chars().count() > max_length {
        let mut truncated = truncate_chars(&result, max_length.saturating_sub(3));
        truncated.push_str("...");
        truncated
    } else {
        result
    }
}
