//! Summarizer adapter: abstractive when a model is wired in, extractive
//! otherwise. Summarization never fails the request; any model error
//! degrades to the extractive path.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use docqa_core::traits::AbstractiveSummarizer;
use docqa_core::types::{SearchHit, SummaryMode, SummaryRecord};

static HEADING_MARKERS: Lazy<Regex> = Lazy::new(|| Regex::new(r"#{1,6}\s*").unwrap());
static EMPHASIS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*{1,2}([^*]+)\*{1,2}").unwrap());
static INLINE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`]+)`").unwrap());
static MARKDOWN_LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").unwrap());
static EXCESS_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());
static EXCESS_SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}").unwrap());

const IMPORTANCE_MARKERS: &[&str] = &[
    "important", "key", "main", "primary", "critical", "essential", "must", "should",
    "responsible", "include",
];

const SECTION_BUDGET_CHARS: usize = 1000;

pub struct SummarizerAdapter {
    abstractive: Option<Box<dyn AbstractiveSummarizer>>,
}

impl Default for SummarizerAdapter {
    fn default() -> Self {
        Self::new(None)
    }
}

impl SummarizerAdapter {
    pub fn new(abstractive: Option<Box<dyn AbstractiveSummarizer>>) -> Self {
        Self { abstractive }
    }

    /// Summarize the aggregated results for one query.
    ///
    /// Only the top hit is used; mixing multiple documents into one
    /// summary degrades coherence. Callers pass a slice already reduced
    /// to a single element.
    pub fn summarize_hits(
        &self,
        hits: &[SearchHit],
        query: &str,
        mode: SummaryMode,
    ) -> SummaryRecord {
        let Some(top) = hits.first() else {
            return SummaryRecord {
                text: "No relevant information found.".to_string(),
                key_points: vec![],
                model_used: "none".to_string(),
            };
        };

        let relevant = extract_relevant_sections(&top.content, query);
        let max_length = match mode {
            SummaryMode::Brief => 80,
            SummaryMode::Detailed => 200,
        };

        if let Some(model) = &self.abstractive {
            match model.summarize(&relevant, max_length, mode) {
                Ok(text) => {
                    return SummaryRecord {
                        key_points: extract_key_points(&relevant),
                        text,
                        model_used: "abstractive".to_string(),
                    };
                }
                Err(e) => {
                    warn!(error = %e, "abstractive summarization failed, using extractive fallback");
                }
            }
        }

        extractive_summary(&relevant, max_length)
    }
}

/// Pull the sections of `content` most relevant to the query keywords,
/// combined up to roughly 1000 characters.
fn extract_relevant_sections(content: &str, query: &str) -> String {
    let query_lower = query.to_lowercase();
    let keywords: Vec<&str> = query_lower.split_whitespace().collect();

    let lines: Vec<&str> = content.lines().collect();
    let mut relevant_sections: Vec<(usize, String)> = Vec::new();
    let mut current_section: Vec<String> = Vec::new();
    let mut section_relevance = 0usize;

    for (i, line) in lines.iter().enumerate() {
        let line_lower = line.to_lowercase();
        let relevance = keywords.iter().filter(|k| line_lower.contains(*k)).count();

        if relevance > 0 || line.starts_with('#') || line.starts_with('*') {
            section_relevance = section_relevance.max(relevance);
            current_section.push((*line).to_string());
            // Grab a few following lines for context, stopping at the
            // next header.
            for j in 1..4 {
                let Some(next_line) = lines.get(i + j) else {
                    break;
                };
                if !next_line.trim().is_empty() {
                    current_section.push((*next_line).to_string());
                }
                if next_line.starts_with('#') {
                    break;
                }
            }
        }

        if (line.trim().is_empty() || line.starts_with('#'))
            && !current_section.is_empty()
            && section_relevance > 0
        {
            let section_text = current_section.join("\n");
            if section_text.len() > 50 {
                relevant_sections.push((section_relevance, section_text));
            }
            current_section.clear();
            section_relevance = 0;
        }
    }
    if !current_section.is_empty() && section_relevance > 0 {
        let section_text = current_section.join("\n");
        if section_text.len() > 50 {
            relevant_sections.push((section_relevance, section_text));
        }
    }

    if relevant_sections.is_empty() {
        return clean_for_summary(&truncate_chars(content, SECTION_BUDGET_CHARS));
    }

    relevant_sections.sort_by(|a, b| b.0.cmp(&a.0));

    let mut parts: Vec<String> = Vec::new();
    let mut total = 0usize;
    for (_, section) in relevant_sections {
        let clean_section = clean_for_summary(&section);
        if total + clean_section.len() < SECTION_BUDGET_CHARS {
            total += clean_section.len();
            parts.push(clean_section);
        } else {
            let remaining = SECTION_BUDGET_CHARS - total;
            if remaining > 100 {
                parts.push(format!("{}...", truncate_chars(&clean_section, remaining)));
            }
            break;
        }
    }
    parts.join("\n\n")
}

/// Leading sentences ranked by inverse position + length.
fn extractive_summary(text: &str, max_length: usize) -> SummaryRecord {
    let sentences: Vec<&str> = text.split('.').collect();

    if sentences.len() <= 2 {
        return SummaryRecord {
            text: truncate_chars(text, max_length),
            key_points: vec![],
            model_used: "extractive".to_string(),
        };
    }

    let mut scored: Vec<(f32, String)> = Vec::new();
    for (i, sentence) in sentences.iter().enumerate() {
        let sentence = sentence.trim();
        if sentence.len() > 20 && sentence.len() < 300 {
            let score = 1.0 / (i as f32 + 1.0) + sentence.len() as f32 / 100.0;
            scored.push((score, sentence.to_string()));
        }
    }
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    let summary_sentences: Vec<String> = scored.into_iter().take(3).map(|(_, s)| s).collect();
    let summary = format!("{}.", summary_sentences.join(". "));

    SummaryRecord {
        text: truncate_chars(&summary, max_length),
        key_points: summary_sentences.into_iter().take(2).collect(),
        model_used: "extractive".to_string(),
    }
}

/// Sentences carrying importance markers, up to three.
fn extract_key_points(text: &str) -> Vec<String> {
    let mut key_points = Vec::new();
    for sentence in text.split('.').take(10) {
        let sentence_lower = sentence.to_lowercase();
        if IMPORTANCE_MARKERS.iter().any(|m| sentence_lower.contains(m)) {
            let clean_sentence = sentence.trim();
            if clean_sentence.len() > 20 && clean_sentence.len() < 200 {
                key_points.push(clean_sentence.to_string());
                if key_points.len() >= 3 {
                    break;
                }
            }
        }
    }
    key_points
}

/// Markdown cleanup for summarizer input: headers, emphasis, inline
/// code, links, excess whitespace.
fn clean_for_summary(text: &str) -> String {
    let text = HEADING_MARKERS.replace_all(text, "");
    let text = EMPHASIS.replace_all(&text, "$1");
    let text = INLINE_CODE.replace_all(&text, "$1");
    let text = MARKDOWN_LINK.replace_all(&text, "$1");
    let text = EXCESS_NEWLINES.replace_all(&text, "\n\n");
    let text = EXCESS_SPACES.replace_all(&text, " ");
    text.trim().to_string()
}

fn truncate_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
