//! Enrollment records with cosine top-k similarity search.
//!
//! [`EmbeddingIndex`] is the narrow interface the verification engine
//! needs from a vector store: `upsert` a user's reference embedding
//! and `query` the nearest enrolled neighbors by cosine similarity.
//! [`MemoryIndex`] is the in-process reference implementation; a
//! remote index (network vector database) can stand behind the same
//! trait without the engine noticing.

pub mod cosine;
mod error;
mod memory;
mod store;

pub use cosine::cosine_similarity;
pub use error::StoreError;
pub use memory::MemoryIndex;
pub use store::{EmbeddingIndex, Match, RecordMeta};
