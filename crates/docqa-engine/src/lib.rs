//! docqa-engine
//!
//! The retrieval-ranking-aggregation-formatting pipeline and its
//! orchestrator. One `SearchEngine` serves one session; `EngineHandle`
//! adds atomic hot-swap reindexing on top.

pub mod aggregate;
pub mod confidence;
pub mod engine;
pub mod format;
pub mod keyword;
pub mod rank;
pub mod retriever;
pub mod summarize;

pub use aggregate::aggregate;
pub use confidence::calculate_confidence;
pub use engine::{EngineConfig, EngineHandle, EngineStats, ReindexStatus, SearchEngine};
pub use format::format_response;
pub use keyword::keyword_search;
pub use rank::rerank;
pub use retriever::Retriever;
pub use summarize::SummarizerAdapter;
