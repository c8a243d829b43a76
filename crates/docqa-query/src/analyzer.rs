//! Query analysis: intent, key terms, synonym expansion, entities.
//!
//! All vocabularies are fixed constants owned by this module. Matching is
//! heuristic substring/token work, not linguistically rigorous; the
//! analyzer always returns a complete structure and never fails.

use std::collections::BTreeSet;

use docqa_core::types::{Entities, QueryAnalysis, QueryType};

const PERSON_INDICATORS: &[&str] = &[
    "who is", "who are", "responsibility", "responsibilities", "cto", "cio", "ceo", "manager",
    "lead", "team", "member",
];
const TECH_INDICATORS: &[&str] = &[
    "technology", "stack", "framework", "library", "tool", "language", "database", "api",
    "frontend", "backend", "ml", "machine learning", "ai", "model",
];
const PROCESS_INDICATORS: &[&str] = &[
    "how to", "process", "procedure", "deploy", "build", "test", "release", "workflow",
    "pipeline",
];
const ARCHITECTURE_INDICATORS: &[&str] = &[
    "architecture", "design", "structure", "component", "system", "integration", "pattern",
];

const STOP_WORDS: &[&str] = &[
    "what", "is", "the", "a", "an", "are", "can", "you", "tell", "me", "about", "of",
];

const QUESTION_WORDS: &[&str] = &["what", "who", "how", "when", "where", "why"];

const ROLE_VOCABULARY: &[&str] = &["cto", "cio", "ceo", "manager", "lead", "developer", "engineer"];

const TECH_VOCABULARY: &[&str] = &[
    "python", "javascript", "react", "node", "docker", "kubernetes", "aws", "azure", "gcp",
    "mongodb", "postgresql", "redis",
];

fn synonyms(term: &str) -> Option<&'static [&'static str]> {
    let expansions: &[&str] = match term {
        "ml" => &["machine learning", "ai", "artificial intelligence", "deep learning"],
        "tech" => &["technology", "technical"],
        "stack" => &["technology stack", "tech stack", "technologies", "tools"],
        "cto" => &["chief technology officer", "technology officer", "tech lead"],
        "cio" => &["chief information officer", "information officer", "it lead"],
        "backend" => &["back-end", "server", "api", "server-side"],
        "frontend" => &["front-end", "ui", "interface", "client-side", "user interface"],
        "database" => &["db", "storage", "data store", "persistence"],
        "deploy" => &["deployment", "release", "rollout", "launch"],
        "test" => &["testing", "qa", "quality assurance", "verification"],
        _ => return None,
    };
    Some(expansions)
}

#[derive(Default)]
pub struct QueryAnalyzer;

impl QueryAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, query: &str) -> QueryAnalysis {
        let query_lower = query.to_lowercase();

        let query_type = classify_query(&query_lower);
        let key_terms = extract_key_terms(&query_lower);
        let expanded_terms = expand_terms(&key_terms);
        let entities = extract_entities(query);

        QueryAnalysis {
            original_query: query.to_string(),
            query_type,
            key_terms,
            expanded_terms,
            entities,
            is_question: query.trim().ends_with('?'),
        }
    }
}

/// The category with the strictly highest indicator count wins; ties keep
/// the first category in enumeration order. Zero matches means General.
fn classify_query(query_lower: &str) -> QueryType {
    let categories: [(QueryType, &[&str]); 4] = [
        (QueryType::Person, PERSON_INDICATORS),
        (QueryType::Technology, TECH_INDICATORS),
        (QueryType::Process, PROCESS_INDICATORS),
        (QueryType::Architecture, ARCHITECTURE_INDICATORS),
    ];

    let mut best = QueryType::General;
    let mut best_count = 0usize;
    for (query_type, indicators) in categories {
        let count = indicators.iter().filter(|ind| query_lower.contains(*ind)).count();
        if count > best_count {
            best = query_type;
            best_count = count;
        }
    }
    best
}

/// Stop-word filtered tokens of length > 2, plus fixed multi-word phrases
/// when their textual triggers appear in the query. Deduplicated in
/// insertion order.
fn extract_key_terms(query_lower: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for word in query_lower.split_whitespace() {
        if !STOP_WORDS.contains(&word) && word.len() > 2 && !terms.iter().any(|t| t == word) {
            terms.push(word.to_string());
        }
    }

    let mut push_phrase = |phrase: &str| {
        if !terms.iter().any(|t| t == phrase) {
            terms.push(phrase.to_string());
        }
    };
    if query_lower.contains("machine learning") {
        push_phrase("machine learning");
    }
    if query_lower.contains("technology stack") || query_lower.contains("tech stack") {
        push_phrase("technology stack");
    }
    if query_lower.contains("chief technology officer") {
        push_phrase("cto");
    }
    if query_lower.contains("chief information officer") {
        push_phrase("cio");
    }

    terms
}

/// Union of key terms and their synonym expansions.
fn expand_terms(terms: &[String]) -> BTreeSet<String> {
    let mut expanded: BTreeSet<String> = terms.iter().cloned().collect();
    for term in terms {
        if let Some(extra) = synonyms(term) {
            expanded.extend(extra.iter().map(|s| (*s).to_string()));
        }
    }
    expanded
}

fn extract_entities(query: &str) -> Entities {
    let mut entities = Entities::default();

    // Naive person-name heuristic: two adjacent capitalized words,
    // excluding question words.
    let words: Vec<&str> = query.split_whitespace().collect();
    for i in 0..words.len() {
        let word = words[i];
        let starts_upper = word.chars().next().map(char::is_uppercase).unwrap_or(false);
        if starts_upper && !QUESTION_WORDS.contains(&word.to_lowercase().as_str()) {
            if let Some(next) = words.get(i + 1) {
                let next_upper = next.chars().next().map(char::is_uppercase).unwrap_or(false);
                if next_upper {
                    entities.people.push(format!("{word} {next}"));
                }
            }
        }
    }

    let query_lower = query.to_lowercase();
    for role in ROLE_VOCABULARY {
        if query_lower.contains(role) {
            entities.roles.push((*role).to_string());
        }
    }
    for tech in TECH_VOCABULARY {
        if query_lower.contains(tech) {
            entities.technologies.push((*tech).to_string());
        }
    }

    entities
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_indicator_matches_classify_as_general() {
        assert_eq!(classify_query("hello there"), QueryType::General);
    }

    #[test]
    fn tie_breaks_on_first_category_in_order() {
        // "team" (person) and "system" (architecture) both score 1.
        assert_eq!(classify_query("team system"), QueryType::Person);
    }
}
