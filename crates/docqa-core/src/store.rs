//! Read-only chunk store loaded wholesale at engine initialization.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

use crate::types::DocumentChunk;

/// Ordered sequence of chunk records. Vector index positions are offsets
/// into this sequence.
pub struct ChunkStore {
    chunks: Vec<DocumentChunk>,
}

impl ChunkStore {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading chunks file {}", path.display()))?;
        let chunks: Vec<DocumentChunk> = serde_json::from_str(&raw)
            .with_context(|| format!("parsing chunks file {}", path.display()))?;
        info!(chunks = chunks.len(), path = %path.display(), "loaded chunk store");
        Ok(Self { chunks })
    }

    pub fn from_chunks(chunks: Vec<DocumentChunk>) -> Self {
        Self { chunks }
    }

    pub fn get(&self, position: usize) -> Option<&DocumentChunk> {
        self.chunks.get(position)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DocumentChunk> {
        self.chunks.iter()
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn document_count(&self) -> usize {
        let titles: HashSet<&str> =
            self.chunks.iter().map(|c| c.document_title.as_str()).collect();
        titles.len()
    }
}
