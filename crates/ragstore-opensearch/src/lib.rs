//! OpenSearch-backed vector store.
//!
//! Owns one connection to the remote engine, one logical index per
//! configured `(prefix, name)` pair, and the request shaping for bulk
//! ingestion and the dense, sparse and hybrid retrieval modes. See `store`
//! for the `VectorStore` implementation, `query` and `schema` for the
//! request bodies.

pub mod client;
pub mod query;
pub mod schema;
pub mod store;

pub use store::OpenSearchStore;
