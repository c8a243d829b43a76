//! docqa-embed
//!
//! Embedding providers behind the `Embedder` trait: a BGE-M3 model run
//! locally through candle, and a deterministic hash-based fake for tests
//! (select with `DOCQA_USE_FAKE_EMBEDDINGS=1`).

pub mod fake;
pub mod model;

use anyhow::Result;
use tracing::info;

pub use docqa_core::traits::Embedder;

pub const EMBEDDING_DIM: usize = 1024;

/// Build the embedder configured for this process.
///
/// `DOCQA_USE_FAKE_EMBEDDINGS=1` selects the fake embedder so tests and
/// offline runs never load model weights.
pub fn get_default_embedder() -> Result<Box<dyn Embedder>> {
    let use_fake = std::env::var("DOCQA_USE_FAKE_EMBEDDINGS")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    if use_fake {
        info!("using fake embedder");
        return Ok(Box::new(fake::FakeEmbedder::new(EMBEDDING_DIM)));
    }
    Ok(Box::new(model::EmbeddingModel::load()?))
}
