//! Keyword fallback search: raw term-count scoring over the chunk store.
//!
//! Used when the vector index or embedding model is unavailable, either
//! for the whole process (degraded mode) or for a single failed request.
//! Carries no vector ranking signal.

use docqa_core::store::ChunkStore;
use docqa_core::types::{QueryAnalysis, SearchHit};
use docqa_extract::extract_highlights;

const SECTION_TITLE_WEIGHT: usize = 3;

/// Score every chunk by raw substring counts; section title matches
/// weigh more than content matches. Chunks with zero matches are
/// dropped.
pub fn keyword_search(store: &ChunkStore, analysis: &QueryAnalysis) -> Vec<SearchHit> {
    let query_lower = analysis.original_query.to_lowercase();
    let terms: Vec<&str> = query_lower.split_whitespace().collect();

    let mut hits = Vec::new();
    for chunk in store.iter() {
        let content_lower = chunk.content.to_lowercase();
        let section_lower = chunk.section_title.to_lowercase();

        let mut score = 0usize;
        for term in &terms {
            if term.len() > 2 {
                score += content_lower.matches(term).count();
                score += section_lower.matches(term).count() * SECTION_TITLE_WEIGHT;
            }
        }

        if score > 0 {
            let highlights = extract_highlights(&chunk.content, analysis.expanded_terms.iter(), 3);
            hits.push(SearchHit {
                content: chunk.content.clone(),
                document_title: chunk.document_title.clone(),
                section_title: chunk.section_title.clone(),
                document_path: chunk.document_path.clone(),
                score: score as f32,
                chunk_id: chunk.chunk_id.clone(),
                highlights,
            });
        }
    }

    hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    hits
}
