//! Final response assembly: contextual title, deduplicated display
//! blocks, source links, confidence, and a hard 2000-character budget.

use std::hash::Hasher;

use once_cell::sync::Lazy;
use regex::Regex;
use twox_hash::XxHash64;

use docqa_core::types::{
    AnalysisSummary, QueryAnalysis, QueryType, RankedResult, SearchHit, SearchResponse, Source,
    round_relevance,
};
use docqa_extract::clean_text;

use crate::confidence::calculate_confidence;

const MESSAGE_BUDGET_CHARS: usize = 2000;
const LINK_RESERVE_CHARS: usize = 200;
const MAX_SOURCES: usize = 3;
const DEDUP_PREFIX_CHARS: usize = 100;

static TRAILING_BLANK_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\n{3,}").unwrap());

/// Assemble the user-facing response from ranked results.
///
/// `confidence_basis` is the aggregated hit set before any summary
/// substitution, so confidence reflects retrieval quality even when the
/// message body is a summary.
pub fn format_response(
    results: &[RankedResult],
    confidence_basis: &[SearchHit],
    analysis: &QueryAnalysis,
) -> SearchResponse {
    if results.is_empty() {
        return no_results_response(analysis);
    }

    if let Some(RankedResult::Summary(record)) = results.first() {
        let sources = confidence_basis
            .first()
            .map(|hit| vec![source_for(hit)])
            .unwrap_or_default();
        return SearchResponse {
            message: truncate_chars(&record.text, MESSAGE_BUDGET_CHARS),
            sources,
            query_analysis: analysis_summary(analysis),
            confidence: calculate_confidence(confidence_basis),
        };
    }

    let hits: Vec<&SearchHit> = results
        .iter()
        .filter_map(|r| match r {
            RankedResult::Hit(hit) => Some(hit),
            RankedResult::Summary(_) => None,
        })
        .collect();

    let mut message_parts: Vec<String> = Vec::new();

    let clean_title = clean_text(&response_title(analysis));
    let mut total_chars = clean_title.chars().count() + 2;
    message_parts.push(clean_title);

    // Format the top hits, skipping near-duplicate content.
    let mut seen_content: Vec<u64> = Vec::new();
    let mut formatted_results: Vec<String> = Vec::new();
    for hit in hits.iter().take(3) {
        let content_hash = prefix_hash(&hit.content);
        if seen_content.contains(&content_hash) {
            continue;
        }
        seen_content.push(content_hash);

        let remaining_chars =
            MESSAGE_BUDGET_CHARS.saturating_sub(total_chars + LINK_RESERVE_CHARS);
        if remaining_chars < 200 {
            break;
        }

        let formatted = docqa_extract::format_for_display(hit, analysis, remaining_chars);
        if !formatted.is_empty() {
            total_chars += formatted.chars().count() + 2;
            formatted_results.push(formatted);
        }
    }

    if formatted_results.is_empty() {
        // Fall back to plain cleaned highlights.
        for hit in hits.iter().take(2) {
            if let Some(highlight) = hit.highlights.first() {
                message_parts.push(format!("• {}", clean_text(highlight)));
            }
        }
    } else {
        message_parts.extend(formatted_results);
    }

    let truncated = hits.len() > 1
        || hits.first().map(|h| h.content.chars().count() > MESSAGE_BUDGET_CHARS).unwrap_or(false);
    if truncated {
        message_parts.push("\n📄 **View full documentation:**".to_string());
    }

    let mut sources: Vec<Source> = Vec::new();
    for hit in hits.iter().take(3) {
        if sources.iter().any(|s| s.title == hit.document_title) {
            continue;
        }
        sources.push(source_for(hit));
        if sources.len() <= MAX_SOURCES {
            message_parts.push(format!("→ {}", hit.document_title));
        }
    }
    sources.truncate(MAX_SOURCES);

    let final_message = message_parts.join("\n\n");
    let final_message = TRAILING_BLANK_RUNS.replace_all(&final_message, "\n\n");

    SearchResponse {
        message: truncate_chars(&final_message, MESSAGE_BUDGET_CHARS),
        sources,
        query_analysis: analysis_summary(analysis),
        confidence: calculate_confidence(confidence_basis),
    }
}

fn source_for(hit: &SearchHit) -> Source {
    let doc_name = if hit.document_path.is_empty() {
        "document"
    } else {
        hit.document_path.rsplit('/').next().unwrap_or("document")
    };
    Source {
        title: hit.document_title.clone(),
        path: hit.document_path.clone(),
        relevance: round_relevance(hit.score),
        link: format!("/docs/{doc_name}"),
    }
}

fn response_title(analysis: &QueryAnalysis) -> String {
    let query_lower = analysis.original_query.to_lowercase();
    match analysis.query_type {
        QueryType::Person => {
            if let Some(person) = analysis.entities.people.first() {
                format!("## {person}")
            } else if query_lower.contains("cto") {
                "## Chief Technology Officer (CTO)".to_string()
            } else if query_lower.contains("cio") {
                "## Chief Information Officer (CIO)".to_string()
            } else {
                "## Team Information".to_string()
            }
        }
        QueryType::Technology => {
            if query_lower.contains("stack") {
                "## Technology Stack".to_string()
            } else if let Some(tech) = analysis.entities.technologies.first() {
                format!("## {} Information", title_case(tech))
            } else {
                "## Technical Information".to_string()
            }
        }
        QueryType::Process => "## Process & Workflow".to_string(),
        QueryType::Architecture => "## System Architecture".to_string(),
        QueryType::General => {
            if analysis.is_question {
                "## Answer".to_string()
            } else {
                "## Information".to_string()
            }
        }
    }
}

/// Helpful response when nothing matched, with category-specific
/// suggestions. Confidence is fixed at low / 0.0.
fn no_results_response(analysis: &QueryAnalysis) -> SearchResponse {
    let suggestions: &[&str] = match analysis.query_type {
        QueryType::Person => &[
            "Team structure and roles",
            "CTO: Alexandra Chen",
            "CIO: Marcus Williams",
            "Development team members",
        ],
        QueryType::Technology => &[
            "Technology stack overview",
            "Frontend frameworks (React, TypeScript)",
            "Backend technologies (Python, Node.js)",
            "Machine learning tools",
        ],
        _ => &[
            "Application architecture",
            "Technology stack",
            "Team members and roles",
            "Development processes",
        ],
    };

    let mut message = format!(
        "## No Results Found\n\nI couldn't find specific information about \"{}\" in the documentation.\n\n### Try asking about:\n",
        analysis.original_query
    );
    for suggestion in suggestions {
        message.push_str(&format!("• {suggestion}\n"));
    }

    SearchResponse {
        message,
        sources: vec![],
        query_analysis: analysis_summary(analysis),
        confidence: calculate_confidence(&[]),
    }
}

fn analysis_summary(analysis: &QueryAnalysis) -> AnalysisSummary {
    AnalysisSummary {
        query_type: analysis.query_type,
        key_terms: analysis.key_terms.clone(),
    }
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn prefix_hash(content: &str) -> u64 {
    let prefix: String = content.chars().take(DEDUP_PREFIX_CHARS).collect();
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(prefix.as_bytes());
    hasher.finish()
}

fn truncate_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
