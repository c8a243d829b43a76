//! Index construction: one row per chunk, keyed by store position.

use anyhow::Result;
use arrow_array::{FixedSizeListArray, Int32Array, RecordBatch, RecordBatchIterator, StringArray};
use indicatif::{ProgressBar, ProgressStyle};
use lancedb::{connect, Connection};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use docqa_core::types::DocumentChunk;

use crate::schema::{build_arrow_schema, VECTOR_DIM};

const WRITE_BATCH_SIZE: usize = 1000;

pub struct LanceIndexBuilder {
    db: Connection,
    table_name: String,
}

impl LanceIndexBuilder {
    pub async fn new(db_path: &Path, table_name: &str) -> Result<Self> {
        let db = connect(db_path.to_string_lossy().as_ref()).execute().await?;
        Ok(Self { db, table_name: table_name.to_string() })
    }

    /// Write one row per chunk. `embeddings[i]` belongs to `chunks[i]`,
    /// and row `position` is `i`, the chunk's offset in the store.
    pub async fn build(&self, chunks: &[DocumentChunk], embeddings: &[Vec<f32>]) -> Result<()> {
        if chunks.is_empty() {
            info!("no chunks to index");
            return Ok(());
        }
        assert_eq!(chunks.len(), embeddings.len(), "chunks and embeddings length must match");
        info!(chunks = chunks.len(), table = self.table_name.as_str(), "building vector index");
        let pb = ProgressBar::new(chunks.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%) {msg}")
                .unwrap()
                .progress_chars("#>-"),
        );

        let mut batch_rows: Vec<(i32, String, Vec<f32>)> = Vec::new();
        for (i, (chunk, embedding)) in chunks.iter().zip(embeddings.iter()).enumerate() {
            batch_rows.push((i as i32, chunk.chunk_id.clone(), embedding.clone()));
            pb.set_position((i + 1) as u64);
            if batch_rows.len() >= WRITE_BATCH_SIZE || i == chunks.len() - 1 {
                self.insert_batch(&batch_rows).await?;
                batch_rows.clear();
            }
        }
        pb.finish_with_message("vector index built");
        info!(rows = chunks.len(), "vector index build complete");
        Ok(())
    }

    async fn insert_batch(&self, rows: &[(i32, String, Vec<f32>)]) -> Result<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let record_batch = rows_to_record_batch(rows)?;
        let schema = record_batch.schema();
        let reader = Box::new(RecordBatchIterator::new(vec![Ok(record_batch)].into_iter(), schema));
        if self.db.table_names().execute().await?.contains(&self.table_name) {
            self.db.open_table(&self.table_name).execute().await?.add(reader).execute().await?;
        } else {
            self.db.create_table(&self.table_name, reader).execute().await?;
        }
        Ok(())
    }
}

fn rows_to_record_batch(rows: &[(i32, String, Vec<f32>)]) -> Result<RecordBatch> {
    let schema = build_arrow_schema();
    let mut positions = Vec::new();
    let mut chunk_ids = Vec::new();
    let mut vectors: Vec<Option<Vec<Option<f32>>>> = Vec::new();
    for (position, chunk_id, vector) in rows {
        positions.push(*position);
        chunk_ids.push(chunk_id.clone());
        vectors.push(Some(vector.iter().map(|&x| Some(x)).collect()));
    }
    let record_batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Int32Array::from(positions)),
            Arc::new(StringArray::from(chunk_ids)),
            Arc::new(FixedSizeListArray::from_iter_primitive::<
                arrow_array::types::Float32Type,
                _,
                _,
            >(vectors.into_iter(), VECTOR_DIM)),
        ],
    )?;
    Ok(record_batch)
}
