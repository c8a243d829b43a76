//! Candidate retrieval: embed the expanded query, k-NN search, hydrate
//! hits from the chunk store.

use anyhow::Result;
use std::path::Path;
use tracing::debug;

use docqa_core::store::ChunkStore;
use docqa_core::traits::{Embedder, VectorIndex};
use docqa_core::types::{QueryAnalysis, SearchHit};
use docqa_extract::extract_highlights;

const MAX_HIGHLIGHTS: usize = 3;

pub struct Retriever {
    embedder: Box<dyn Embedder>,
    index: Box<dyn VectorIndex>,
}

impl Retriever {
    pub fn new(embedder: Box<dyn Embedder>, index: Box<dyn VectorIndex>) -> Self {
        Self { embedder, index }
    }

    /// Build a retriever over the default providers: local embedding
    /// model (or the fake) plus the on-disk LanceDB index.
    pub fn open(index_dir: &Path, table_name: &str) -> Result<Self> {
        let embedder = docqa_embed::get_default_embedder()?;
        let index = docqa_vector::LanceVectorIndex::open(index_dir, table_name)?;
        Ok(Self::new(embedder, Box::new(index)))
    }

    /// Produce the candidate set of scored hits for one query.
    ///
    /// The query is embedded together with its expanded terms. Index
    /// positions out of range of the chunk store are skipped. Base score
    /// is the similarity `1 / (1 + distance)`.
    pub fn search(
        &self,
        store: &ChunkStore,
        analysis: &QueryAnalysis,
        k: usize,
    ) -> Result<Vec<SearchHit>> {
        let expanded_query = format!(
            "{} {}",
            analysis.original_query,
            analysis.expanded_terms.iter().cloned().collect::<Vec<_>>().join(" ")
        );
        let query_vec = self.embedder.embed_batch(&[expanded_query])?.remove(0);
        let pairs = self.index.search(&query_vec, k)?;
        debug!(candidates = pairs.len(), "vector search returned candidates");

        let mut hits = Vec::new();
        for (distance, position) in pairs {
            let Some(chunk) = store.get(position) else {
                continue;
            };
            let highlights =
                extract_highlights(&chunk.content, analysis.expanded_terms.iter(), MAX_HIGHLIGHTS);
            hits.push(SearchHit {
                content: chunk.content.clone(),
                document_title: chunk.document_title.clone(),
                section_title: chunk.section_title.clone(),
                document_path: chunk.document_path.clone(),
                score: 1.0 / (1.0 + distance),
                chunk_id: chunk.chunk_id.clone(),
                highlights,
            });
        }
        Ok(hits)
    }
}
