//! Domain types shared by every vector-store backend.

use serde::{Deserialize, Serialize};

use crate::traits::Embedder;

/// Number of results returned by `search` when the caller has no opinion.
pub const DEFAULT_TOP_K: usize = 5;

/// A unit of ingested content.
///
/// - `page_content`: the text payload, used for identity derivation and
///   lexical matching
/// - `filename`: origin of the chunk, part of its identity
/// - `doc_type`/`source`/`language`: free-form metadata, stored verbatim
///
/// Chunks are borrowed by `insert_chunks` and never retained; the store
/// persists a derived record, not the chunk itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Chunk {
    pub page_content: String,
    pub filename: String,
    #[serde(rename = "type", default)]
    pub doc_type: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub language: String,
}

/// Retrieval strategy executed by the remote engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Approximate nearest-neighbor search over the embedding field.
    Dense,
    /// Lexical match on `page_content`.
    Sparse,
    /// Both branches in one query, fused server-side.
    #[default]
    Hybrid,
}

/// Knobs for a single `search` call.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub top_k: usize,
    pub mode: SearchMode,
    /// Exact-match filter on the `language` field; `None` or empty means
    /// no filtering.
    pub language: Option<String>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { top_k: DEFAULT_TOP_K, mode: SearchMode::Hybrid, language: None }
    }
}

/// The minimal surface returned by all retrieval modes.
///
/// `score` is mode-specific but higher is always better within one mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub chunk_id: i64,
    pub page_content: String,
    pub filename: String,
    #[serde(rename = "type", default)]
    pub doc_type: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub score: f32,
}

/// What an ingestion call actually committed.
///
/// On a partial batch failure the error carries the committed count instead,
/// so callers can retry exactly the unprocessed remainder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsertReport {
    pub indexed: usize,
    pub chunk_ids: Vec<i64>,
}

/// Where document embeddings come from during ingestion.
///
/// The two modes are mutually exclusive by construction: either the caller
/// precomputed one vector per chunk, or the store embeds each batch through
/// the supplied capability.
#[derive(Clone, Copy)]
pub enum EmbeddingSource<'a> {
    Precomputed(&'a [Vec<f32>]),
    Embedder(&'a dyn Embedder),
}

/// Where the query embedding comes from during retrieval.
#[derive(Clone, Copy)]
pub enum QuerySource<'a> {
    Vector(&'a [f32]),
    Embedder(&'a dyn Embedder),
}
