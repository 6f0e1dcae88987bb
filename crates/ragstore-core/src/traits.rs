use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    Chunk, EmbeddingSource, InsertReport, QuerySource, SearchOptions, SearchResult,
};

/// Number of chunks submitted per bulk write when the caller has no opinion.
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Capability contract every vector-store backend must satisfy.
///
/// All operations are request/response: they block the caller on network
/// I/O to the remote engine and perform no internal retries. Consistency
/// between a write and a subsequent read is governed by the engine, not by
/// this contract.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Ingests `chunks` in sequential batches of `batch_size`.
    ///
    /// Chunk identifiers are derived from each chunk's position in the
    /// overall sequence, so re-ingesting the same chunks overwrites rather
    /// than duplicates. A batch that fails to persist aborts the call;
    /// batches already written stay committed.
    async fn insert_chunks(
        &self,
        chunks: &[Chunk],
        source: EmbeddingSource<'_>,
        batch_size: usize,
    ) -> Result<InsertReport>;

    /// Retrieves the `opts.top_k` most relevant chunks for `query`.
    ///
    /// Fails with `Error::NotReady` if nothing has been ingested yet.
    async fn search(
        &self,
        query: &str,
        source: QuerySource<'_>,
        opts: &SearchOptions,
    ) -> Result<Vec<SearchResult>>;

    /// Deletes the remote index if present and clears associated local
    /// cache artifacts. Idempotent.
    async fn reset_index(&self) -> Result<()>;

    /// True iff the index exists, i.e. at least one ingestion completed.
    async fn is_populated(&self) -> Result<bool>;
}

/// External embedding capability consumed by the store.
///
/// Implementations live outside this workspace; tests use deterministic
/// fakes.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed_documents(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;
    async fn embed_query(&self, text: &str) -> anyhow::Result<Vec<f32>>;
}
