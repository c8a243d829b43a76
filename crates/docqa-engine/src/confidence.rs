//! Confidence estimation from boosted scores.
//!
//! The thresholds are empirically tuned against the boost magnitudes in
//! `rank` and are kept verbatim.

use docqa_core::types::{Confidence, ConfidenceLevel, SearchHit};

/// Derive a confidence estimate from the final (pre-summary) result set.
pub fn calculate_confidence(results: &[SearchHit]) -> Confidence {
    let Some(top) = results.first() else {
        return Confidence {
            level: ConfidenceLevel::Low,
            score: 0.0,
            explanation: "No relevant results found".to_string(),
            factors: vec![],
        };
    };

    let (level, mut score, explanation) = if top.score > 2.0 {
        (
            ConfidenceLevel::High,
            (top.score / 3.0).min(0.95),
            "Strong match against the documentation",
        )
    } else if top.score > 1.0 {
        (
            ConfidenceLevel::Medium,
            0.6 + (top.score - 1.0) * 0.2,
            "Good match against the documentation",
        )
    } else if top.score > 0.5 {
        (
            ConfidenceLevel::Low,
            0.3 + (top.score - 0.5) * 0.4,
            "Partial match against the documentation",
        )
    } else {
        (
            ConfidenceLevel::VeryLow,
            (top.score * 0.4).max(0.1),
            "Weak match against the documentation",
        )
    };

    let mut factors = Vec::new();
    if results.get(1).map(|second| second.score > 1.0).unwrap_or(false) {
        score = (score + 0.1).min(1.0);
        factors.push("multiple sources".to_string());
    }
    factors.push("direct match".to_string());

    Confidence { level, score, explanation: explanation.to_string(), factors }
}
