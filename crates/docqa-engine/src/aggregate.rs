//! Per-document grouping and capping for result diversity.
//!
//! A single very relevant document cannot consume the whole result set
//! unless it is the only matching document.

use docqa_core::types::SearchHit;

const MAX_RESULTS: usize = 5;
const SINGLE_DOC_CAP: usize = 3;
const MULTI_DOC_CAP: usize = 2;

/// Group ranked hits by document title (first-seen order), cap each
/// group, then re-sort the flattened set and keep the top five.
pub fn aggregate(hits: Vec<SearchHit>) -> Vec<SearchHit> {
    let mut groups: Vec<(String, Vec<SearchHit>)> = Vec::new();
    for hit in hits {
        match groups.iter_mut().find(|(title, _)| *title == hit.document_title) {
            Some((_, group)) => group.push(hit),
            None => groups.push((hit.document_title.clone(), vec![hit])),
        }
    }

    let doc_limit = if groups.len() == 1 { SINGLE_DOC_CAP } else { MULTI_DOC_CAP };

    let mut final_results = Vec::new();
    for (_, mut group) in groups {
        group.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        final_results.extend(group.into_iter().take(doc_limit));
    }

    final_results
        .sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    final_results.truncate(MAX_RESULTS);
    final_results
}
