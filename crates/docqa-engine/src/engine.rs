//! Search engine orchestration: query analysis, retrieval, re-ranking,
//! aggregation, optional summarization, formatting, and conversational
//! context, behind a hot-swappable handle.

use std::path::PathBuf;
use std::sync::RwLock;

use serde::Serialize;
use tracing::{info, warn};

use docqa_core::error::{Error, Result};
use docqa_core::store::ChunkStore;
use docqa_core::types::{EngineMode, RankedResult, SearchHit, SearchRequest, SearchResponse};
use docqa_query::{ConversationalContext, QueryAnalyzer};

use crate::aggregate::aggregate;
use crate::format::format_response;
use crate::keyword::keyword_search;
use crate::rank::rerank;
use crate::retriever::Retriever;
use crate::summarize::SummarizerAdapter;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub chunks_path: PathBuf,
    pub index_dir: PathBuf,
    pub table_name: String,
    pub top_k: usize,
    pub window_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            chunks_path: PathBuf::from("data/document_chunks.json"),
            index_dir: PathBuf::from("data/lancedb"),
            table_name: "chunks".to_string(),
            top_k: 10,
            window_size: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EngineStats {
    pub mode: EngineMode,
    pub total_chunks: usize,
    pub total_documents: usize,
}

/// Outcome of a reindex-and-swap: `Partial` means the new engine came
/// up without vector search and serves keyword-only results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReindexStatus {
    Success,
    Partial,
}

pub struct SearchEngine {
    store: ChunkStore,
    analyzer: QueryAnalyzer,
    context: ConversationalContext,
    retriever: Option<Retriever>,
    summarizer: SummarizerAdapter,
    mode: EngineMode,
    top_k: usize,
}

impl SearchEngine {
    /// Load the chunk store and try to attach the vector retriever. A
    /// missing or broken index degrades to keyword mode rather than
    /// failing startup; a missing chunk store is fatal.
    pub fn initialize(config: &EngineConfig) -> anyhow::Result<Self> {
        let store = ChunkStore::load(&config.chunks_path)?;

        let (retriever, mode) = match Retriever::open(&config.index_dir, &config.table_name) {
            Ok(retriever) => (Some(retriever), EngineMode::Vector),
            Err(e) => {
                warn!(error = %e, "vector index unavailable, falling back to keyword search");
                (None, EngineMode::Keyword)
            }
        };

        info!(
            chunks = store.len(),
            documents = store.document_count(),
            ?mode,
            "search engine initialized"
        );

        Ok(Self {
            store,
            analyzer: QueryAnalyzer::new(),
            context: ConversationalContext::new(config.window_size),
            retriever,
            summarizer: SummarizerAdapter::default(),
            mode,
            top_k: config.top_k,
        })
    }

    /// Answer one request end to end.
    pub fn search(&mut self, request: &SearchRequest) -> Result<SearchResponse> {
        if request.query.trim().is_empty() {
            return Err(Error::EmptyQuery);
        }

        if let Some(turns) = &request.context {
            self.context.seed(turns);
        }

        let (effective_query, is_follow_up) = self.context.expand_query(&request.query);
        if is_follow_up {
            info!(original = %request.query, expanded = %effective_query, "expanded follow-up query");
        }

        let analysis = self.analyzer.analyze(&effective_query);
        let top_k = request.top_k.unwrap_or(self.top_k);

        let hits = self.retrieve(&analysis, top_k * 2);
        let ranked = rerank(hits, &analysis);
        let aggregated = aggregate(ranked);

        let results: Vec<RankedResult> = if aggregated.is_empty() {
            vec![]
        } else if let Some(mode) = request.summary_mode {
            let record =
                self.summarizer.summarize_hits(&aggregated[..1], &effective_query, mode);
            vec![RankedResult::Summary(record)]
        } else {
            aggregated.iter().cloned().map(RankedResult::Hit).collect()
        };

        let response = format_response(&results, &aggregated, &analysis);
        self.context.add_interaction(&effective_query, &response.message);
        Ok(response)
    }

    fn retrieve(&self, analysis: &docqa_core::types::QueryAnalysis, k: usize) -> Vec<SearchHit> {
        match &self.retriever {
            Some(retriever) => match retriever.search(&self.store, analysis, k) {
                Ok(hits) => hits,
                Err(e) => {
                    warn!(error = %e, "vector search failed, using keyword fallback");
                    keyword_search(&self.store, analysis)
                }
            },
            None => keyword_search(&self.store, analysis),
        }
    }

    pub fn mode(&self) -> EngineMode {
        self.mode
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            mode: self.mode,
            total_chunks: self.store.len(),
            total_documents: self.store.document_count(),
        }
    }

    pub fn clear_context(&mut self) {
        self.context.clear();
    }
}

/// Shared handle over the engine. Reindexing builds a complete new
/// engine first, then swaps it in under a single write lock so readers
/// never observe a half-initialized state.
pub struct EngineHandle {
    inner: RwLock<SearchEngine>,
}

impl EngineHandle {
    pub fn new(engine: SearchEngine) -> Self {
        Self { inner: RwLock::new(engine) }
    }

    pub fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        let mut engine = self
            .inner
            .write()
            .map_err(|_| Error::Operation("engine lock poisoned".to_string()))?;
        engine.search(request)
    }

    pub fn stats(&self) -> Result<EngineStats> {
        let engine = self
            .inner
            .read()
            .map_err(|_| Error::Operation("engine lock poisoned".to_string()))?;
        Ok(engine.stats())
    }

    /// Replace the running engine with one freshly initialized from
    /// `config`. The old engine keeps serving until the swap.
    pub fn reindex(&self, config: &EngineConfig) -> Result<ReindexStatus> {
        let fresh = SearchEngine::initialize(config)
            .map_err(|e| Error::Operation(format!("reindex failed: {e}")))?;
        let status = match fresh.mode() {
            EngineMode::Vector => ReindexStatus::Success,
            EngineMode::Keyword => ReindexStatus::Partial,
        };

        let mut engine = self
            .inner
            .write()
            .map_err(|_| Error::Operation("engine lock poisoned".to_string()))?;
        *engine = fresh;
        Ok(status)
    }
}
