//! Domain types shared by the query, ranking and formatting stages.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A section of a source document, the unit of retrieval.
///
/// Chunks are produced once by the indexer and are immutable during
/// serving. Vector index positions are offsets into the chunk store's
/// ordered sequence of these records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub document_title: String,
    pub document_path: String,
    #[serde(default)]
    pub section_title: String,
    #[serde(default)]
    pub chunk_id: String,
    pub content: String,
    pub chunk_index: usize,
    pub total_chunks: usize,
}

/// Coarse classification of a query's purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryType {
    Person,
    Technology,
    Process,
    Architecture,
    General,
}

/// Named entities pulled out of a query by heuristic matching.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entities {
    pub people: Vec<String>,
    pub technologies: Vec<String>,
    pub roles: Vec<String>,
}

/// Per-request analysis of a query, immutable once built.
///
/// Invariant: every member of `key_terms` also appears in
/// `expanded_terms`.
#[derive(Debug, Clone)]
pub struct QueryAnalysis {
    pub original_query: String,
    pub query_type: QueryType,
    pub key_terms: Vec<String>,
    pub expanded_terms: BTreeSet<String>,
    pub entities: Entities,
    pub is_question: bool,
}

/// A chunk annotated with a relevance score and highlights for one query.
///
/// `score` starts as a similarity in (0, 1] derived from vector distance
/// and is replaced by the ranking stage with a boosted value. Later
/// stages always read the latest score.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub content: String,
    pub document_title: String,
    pub section_title: String,
    pub document_path: String,
    pub score: f32,
    pub chunk_id: String,
    pub highlights: Vec<String>,
}

/// Output of the summarizer adapter.
#[derive(Debug, Clone)]
pub struct SummaryRecord {
    pub text: String,
    pub key_points: Vec<String>,
    pub model_used: String,
}

/// A final pipeline result: either a ranked hit or a pre-built summary.
///
/// The formatter branches on this tag rather than inspecting the
/// structure of a dynamically shaped record.
#[derive(Debug, Clone)]
pub enum RankedResult {
    Hit(SearchHit),
    Summary(SummaryRecord),
}

/// One query/response pair held in the conversational window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub query: String,
    pub response: String,
}

/// Requested summary length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryMode {
    Brief,
    Detailed,
}

/// A search request as consumed by the orchestrator.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub top_k: Option<usize>,
    #[serde(default)]
    pub summary_mode: Option<SummaryMode>,
    #[serde(default)]
    pub context: Option<Vec<ConversationTurn>>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self { query: query.into(), ..Self::default() }
    }
}

/// A citation entry in the response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub path: String,
    pub relevance: f32,
    pub link: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
    VeryLow,
}

/// Confidence estimate derived from the top result scores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Confidence {
    pub level: ConfidenceLevel,
    pub score: f32,
    pub explanation: String,
    pub factors: Vec<String>,
}

/// The `query_analysis` echo included in every response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSummary {
    #[serde(rename = "type")]
    pub query_type: QueryType,
    pub key_terms: Vec<String>,
}

/// The user-facing response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub message: String,
    pub sources: Vec<Source>,
    pub query_analysis: AnalysisSummary,
    pub confidence: Confidence,
}

/// Which retrieval path the engine is currently using.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineMode {
    Vector,
    Keyword,
}

/// Round a relevance score to two decimals for the citation list.
pub fn round_relevance(score: f32) -> f32 {
    (score * 100.0).round() / 100.0
}
