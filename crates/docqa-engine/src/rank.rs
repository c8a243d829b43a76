//! Intent-aware re-ranking.
//!
//! Boosts are multiplicative and compound in a fixed order; the
//! magnitudes are empirically tuned and must not be "improved". Scoring
//! is pure: each hit gets a fresh boosted score, then a stable
//! descending sort preserves input order among ties.

use docqa_core::types::{QueryAnalysis, QueryType, SearchHit};

const PERSON_SECTION_TERMS: &[&str] = &["team", "people", "responsibilities"];
const PROCESS_SECTION_TERMS: &[&str] = &["process", "workflow", "deployment"];

/// Re-score and sort candidates for the analyzed query.
pub fn rerank(hits: Vec<SearchHit>, analysis: &QueryAnalysis) -> Vec<SearchHit> {
    let mut ranked: Vec<SearchHit> = hits
        .into_iter()
        .map(|hit| {
            let score = boosted_score(&hit, analysis);
            SearchHit { score, ..hit }
        })
        .collect();
    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    ranked
}

/// Apply every boost, in this exact order, to the hit's base similarity.
fn boosted_score(hit: &SearchHit, analysis: &QueryAnalysis) -> f32 {
    let mut score = hit.score;
    let section_lower = hit.section_title.to_lowercase();
    let content_lower = hit.content.to_lowercase();
    let doc_lower = hit.document_title.to_lowercase();
    let query_lower = analysis.original_query.to_lowercase();

    match analysis.query_type {
        QueryType::Person => {
            if PERSON_SECTION_TERMS.iter().any(|t| section_lower.contains(t)) {
                score *= 2.0;
            }
            if analysis.entities.roles.iter().any(|r| content_lower.contains(r.as_str())) {
                score *= 1.5;
            }
        }
        QueryType::Technology => {
            // Strong boost for the technology stack document itself.
            if doc_lower.contains("technology stack") {
                score *= 3.0;
                if query_lower.contains("machine learning") {
                    if section_lower.contains("machine learning stack") {
                        score *= 5.0;
                    } else if section_lower.contains("embedding") || section_lower.contains("vector")
                    {
                        score *= 3.0;
                    } else if section_lower.contains("language model") {
                        score *= 3.0;
                    }
                }
            }
            if analysis
                .entities
                .technologies
                .iter()
                .any(|t| content_lower.contains(t.as_str()))
            {
                score *= 1.5;
            }
            // Penalize non-technical content.
            if section_lower.contains("learning resources")
                || section_lower.contains("professional development")
            {
                score *= 0.1;
            }
        }
        QueryType::Process => {
            if PROCESS_SECTION_TERMS.iter().any(|t| section_lower.contains(t)) {
                score *= 1.8;
            }
        }
        QueryType::Architecture | QueryType::General => {}
    }

    // Exact phrase matches.
    if query_lower.contains("machine learning") && section_lower.contains("machine learning stack")
    {
        score *= 10.0;
    } else if content_lower.contains(&query_lower) {
        score *= 2.5;
    }

    // Title matches compound per term.
    for term in &analysis.key_terms {
        if term.len() > 3 && section_lower.contains(term.as_str()) {
            score *= 1.5;
        }
        if term.len() > 3 && doc_lower.contains(term.as_str()) {
            score *= 1.3;
        }
    }

    score
}
