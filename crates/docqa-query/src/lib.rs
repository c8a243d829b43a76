//! docqa-query
//!
//! Query understanding: intent classification, key-term extraction and
//! expansion, heuristic entity detection, and the conversational window
//! used to rewrite follow-up queries.

#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod analyzer;
pub mod context;

pub use analyzer::QueryAnalyzer;
pub use context::ConversationalContext;
