use arrow_schema::{DataType, Field, Schema};
use std::sync::Arc;

/// Must match the embedding provider's output dimension (BGE-M3).
pub const VECTOR_DIM: i32 = 1024;

pub fn build_arrow_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("position", DataType::Int32, false),
        Field::new("chunk_id", DataType::Utf8, false),
        Field::new(
            "vector",
            DataType::FixedSizeList(
                Arc::new(Field::new("item", DataType::Float32, true)),
                VECTOR_DIM,
            ),
            true,
        ),
    ]))
}
