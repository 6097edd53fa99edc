// Embedding spaces: the vector tables every scorer reads from.
//
// The core only talks to the EmbeddingSpace trait. VectorTable is the
// in-memory implementation, and the loader fills it from word2vec/GloVe files.

pub mod loader;
pub mod math;
pub mod table;
pub mod traits;

pub use table::VectorTable;
pub use traits::{EmbeddingSpace, Neighbor};
