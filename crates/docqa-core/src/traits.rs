//! Contracts for the external collaborators of the pipeline.

use crate::types::SummaryMode;

/// Embedding provider: text in, fixed-length vector out.
///
/// Deterministic for a fixed model. A failure here is fatal to vector
/// retrieval for the current request.
pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;
}

/// Nearest-neighbour index over the chunk store.
pub trait VectorIndex: Send + Sync {
    /// Returns `(distance, chunk position)` pairs ordered ascending by
    /// distance. Positions out of range of the chunk store are the
    /// caller's job to skip, not an error.
    fn search(&self, query_vec: &[f32], k: usize) -> anyhow::Result<Vec<(f32, usize)>>;
}

/// Abstractive summarizer: shorter text out, may fail.
///
/// Callers must fall back to an extractive method on error; a summarizer
/// failure never propagates to the user.
pub trait AbstractiveSummarizer: Send + Sync {
    fn summarize(&self, text: &str, max_length: usize, mode: SummaryMode) -> anyhow::Result<String>;
}
