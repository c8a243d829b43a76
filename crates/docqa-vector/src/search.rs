//! k-NN search over the chunk-position index.

use anyhow::{anyhow, Result};
use futures::TryStreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::{connect, Connection};
use std::path::Path;

use docqa_core::traits::VectorIndex;

/// Synchronous facade over the async LanceDB table. Owns a runtime so
/// the search pipeline stays blocking end to end.
pub struct LanceVectorIndex {
    db: Connection,
    table_name: String,
    rt: tokio::runtime::Runtime,
}

impl LanceVectorIndex {
    pub fn open(db_path: &Path, table_name: &str) -> Result<Self> {
        let rt = tokio::runtime::Runtime::new()?;
        let db = rt.block_on(async {
            connect(db_path.to_string_lossy().as_ref()).execute().await
        })?;
        // Fail now rather than on the first query if the table is absent.
        let names = rt.block_on(async { db.table_names().execute().await })?;
        if !names.contains(&table_name.to_string()) {
            return Err(anyhow!("vector table '{}' not found in {}", table_name, db_path.display()));
        }
        Ok(Self { db, table_name: table_name.to_string(), rt })
    }
}

impl VectorIndex for LanceVectorIndex {
    fn search(&self, query_vec: &[f32], k: usize) -> Result<Vec<(f32, usize)>> {
        let mut pairs: Vec<(f32, usize)> = Vec::new();
        self.rt.block_on(async {
            let table = self.db.open_table(&self.table_name).execute().await?;
            let mut stream = table
                .vector_search(query_vec.to_vec())?
                .limit(k)
                .execute()
                .await?;
            while let Some(batch) = TryStreamExt::try_next(&mut stream).await? {
                let positions = batch
                    .column_by_name("position")
                    .and_then(|c| c.as_any().downcast_ref::<arrow_array::Int32Array>().cloned())
                    .ok_or_else(|| anyhow!("missing 'position' column"))?;
                let distances = batch
                    .column_by_name("_distance")
                    .and_then(|c| c.as_any().downcast_ref::<arrow_array::Float32Array>().cloned())
                    .ok_or_else(|| anyhow!("missing '_distance' column"))?;
                for i in 0..batch.num_rows() {
                    pairs.push((distances.value(i), positions.value(i) as usize));
                }
            }
            Ok::<(), anyhow::Error>(())
        })?;
        // LanceDB already returns ascending distances; keep the guarantee
        // explicit across batches.
        pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        Ok(pairs)
    }
}
