//! Bounded conversational window and follow-up query rewriting.
//!
//! One instance per session. The design assumes single-session use;
//! multi-session deployments must key one instance per session.

use std::collections::VecDeque;
use tracing::debug;

use docqa_core::types::ConversationTurn;

const DEFAULT_WINDOW_SIZE: usize = 2;
const MAX_RECORDED_RESPONSE_CHARS: usize = 500;

const FOLLOW_UP_PATTERNS: &[&str] = &[
    "tell me more",
    "more about",
    "what about",
    "how about",
    "and what",
    "anything else",
    "elaborate",
    "explain further",
    "more details",
    "more information",
];

const PRONOUNS: &[&str] = &["it", "this", "that", "these", "those", "them", "their", "his", "her"];

const TOPIC_STOP_WORDS: &[&str] = &[
    "what", "who", "where", "when", "how", "is", "are", "the", "a", "an", "and", "or", "but",
    "in", "on", "at", "to", "for",
];

pub struct ConversationalContext {
    window_size: usize,
    window: VecDeque<ConversationTurn>,
}

impl Default for ConversationalContext {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_SIZE)
    }
}

impl ConversationalContext {
    pub fn new(window_size: usize) -> Self {
        Self { window_size, window: VecDeque::new() }
    }

    /// Append a completed turn, evicting the oldest when over capacity.
    /// Responses are truncated to 500 characters before recording.
    pub fn add_interaction(&mut self, query: &str, response: &str) {
        self.window.push_back(ConversationTurn {
            query: query.to_string(),
            response: truncate_chars(response, MAX_RECORDED_RESPONSE_CHARS),
        });
        while self.window.len() > self.window_size {
            self.window.pop_front();
        }
    }

    /// Fold externally supplied turns (e.g. from a stateless request)
    /// into the window.
    pub fn seed(&mut self, turns: &[ConversationTurn]) {
        for turn in turns {
            self.add_interaction(&turn.query, &turn.response);
        }
    }

    /// Rewrite a follow-up query into a self-contained one.
    ///
    /// Returns the (possibly unchanged) query and whether expansion
    /// happened.
    pub fn expand_query(&self, query: &str) -> (String, bool) {
        let Some(last) = self.window.back() else {
            return (query.to_string(), false);
        };

        let query_lower = query.to_lowercase();
        let is_follow_up = FOLLOW_UP_PATTERNS.iter().any(|p| query_lower.contains(p));
        let padded = format!(" {query_lower} ");
        let has_pronoun = PRONOUNS.iter().any(|p| padded.contains(&format!(" {p} ")));

        if !is_follow_up && !has_pronoun {
            return (query.to_string(), false);
        }

        let topic = extract_topic(&last.query);
        let expanded = if is_follow_up {
            if query_lower.contains("tell me more") {
                format!("{topic} - provide more detailed information")
            } else if let Some((_, suffix)) = query_lower.split_once("what about") {
                format!("{} related to {}", suffix.trim(), topic)
            } else {
                format!("{query} regarding {topic}")
            }
        } else {
            resolve_pronouns(query, &topic)
        };
        debug!(original = query, expanded = expanded.as_str(), "expanded follow-up query");
        (expanded, true)
    }

    /// Render the window for inclusion in prompts.
    pub fn context_prompt(&self) -> String {
        let mut parts = Vec::new();
        for turn in &self.window {
            parts.push(format!("Previous Q: {}", turn.query));
            parts.push(format!("Previous A: {}...", truncate_chars(&turn.response, 200)));
        }
        parts.join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    pub fn clear(&mut self) {
        self.window.clear();
    }
}

/// First three meaningful tokens of the most recent query.
fn extract_topic(last_query: &str) -> String {
    let lower = last_query.to_lowercase();
    let topic_words: Vec<&str> = lower
        .split_whitespace()
        .filter(|w| !TOPIC_STOP_WORDS.contains(w) && w.len() > 2)
        .take(3)
        .collect();
    if topic_words.is_empty() {
        "the previous topic".to_string()
    } else {
        topic_words.join(" ")
    }
}

/// Substitute bare pronoun tokens with the topic inline. The matching is
/// intentionally case-sensitive, mirroring how bare pronouns appear
/// mid-sentence.
fn resolve_pronouns(query: &str, topic: &str) -> String {
    let mut resolved = query.to_string();
    let substitutions = [
        (" it ".to_string(), format!(" {topic} ")),
        (" its ".to_string(), format!(" {topic}'s ")),
        (" this ".to_string(), format!(" {topic} ")),
        (" that ".to_string(), format!(" {topic} ")),
    ];
    for (pronoun, replacement) in &substitutions {
        resolved = resolved.replace(pronoun.as_str(), replacement.as_str());
    }
    resolved
}

fn truncate_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
