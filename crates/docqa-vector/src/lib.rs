//! docqa-vector
//!
//! LanceDB-backed nearest-neighbour index over chunk embeddings. Rows
//! carry the chunk's position in the chunk store; search returns
//! `(distance, position)` pairs ascending by distance.

pub mod schema;
pub mod search;
pub mod writer;

pub use search::LanceVectorIndex;
pub use writer::LanceIndexBuilder;
