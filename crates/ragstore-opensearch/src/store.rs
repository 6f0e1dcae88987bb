//! `VectorStore` implementation backed by a remote OpenSearch engine.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use tracing::{debug, error, info, warn};

use ragstore_core::config::OpenSearchConfig;
use ragstore_core::error::{Error, Result};
use ragstore_core::identity;
use ragstore_core::traits::VectorStore;
use ragstore_core::types::{
    Chunk, EmbeddingSource, InsertReport, QuerySource, SearchMode, SearchOptions, SearchResult,
};

use crate::client::{EngineClient, Hit};
use crate::query;
use crate::schema;

pub struct OpenSearchStore {
    client: EngineClient,
    index_name: String,
    cache_dir: PathBuf,
}

impl OpenSearchStore {
    /// Opens the connection and registers the hybrid scoring pipeline.
    ///
    /// Pipeline registration failure is logged and non-fatal: hybrid
    /// queries then run under the server's default combination instead of
    /// the configured weighting.
    pub async fn connect(config: OpenSearchConfig) -> Result<Self> {
        let store = Self {
            client: EngineClient::new(&config)?,
            index_name: config.physical_index_name(),
            cache_dir: config.cache_dir,
        };
        if let Err(e) = store
            .client
            .put_search_pipeline(schema::HYBRID_PIPELINE_ID, &schema::hybrid_pipeline_body())
            .await
        {
            warn!("failed to register hybrid search pipeline: {e}");
        }
        Ok(store)
    }

    /// Physical index name in the remote engine.
    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    /// Creates the index for the given dimensionality unless it already
    /// exists. Called on first write, never at construction, because the
    /// dimensionality is only known once the first embedding is seen.
    async fn ensure_index(&self, dim: usize) -> Result<()> {
        if self.client.index_exists(&self.index_name).await? {
            debug!(index = %self.index_name, "index already present");
            return Ok(());
        }
        info!(index = %self.index_name, dim, "creating index");
        self.client.create_index(&self.index_name, &schema::index_body(dim)).await
    }
}

#[async_trait]
impl VectorStore for OpenSearchStore {
    async fn insert_chunks(
        &self,
        chunks: &[Chunk],
        source: EmbeddingSource<'_>,
        batch_size: usize,
    ) -> Result<InsertReport> {
        if chunks.is_empty() {
            debug!("nothing to insert");
            return Ok(InsertReport::default());
        }
        if batch_size == 0 {
            return Err(Error::InvalidArgument("batch_size must be non-zero".to_string()));
        }
        if let EmbeddingSource::Precomputed(vectors) = source {
            if vectors.len() != chunks.len() {
                return Err(Error::InvalidArgument(format!(
                    "got {} vectors for {} chunks",
                    vectors.len(),
                    chunks.len()
                )));
            }
            // Dimensionality is known up front, create the index before any write.
            self.ensure_index(vectors[0].len()).await?;
        }

        debug!(count = chunks.len(), index = %self.index_name, "inserting chunks");
        let pb = ProgressBar::new(chunks.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%)")
                .unwrap()
                .progress_chars("#>-"),
        );

        let mut report = InsertReport::default();
        for (batch_no, batch) in chunks.chunks(batch_size).enumerate() {
            let offset = batch_no * batch_size;
            let embeddings: Vec<Vec<f32>> = match source {
                EmbeddingSource::Precomputed(vectors) => {
                    vectors[offset..offset + batch.len()].to_vec()
                }
                EmbeddingSource::Embedder(embedder) => {
                    let texts: Vec<String> =
                        batch.iter().map(|c| c.page_content.clone()).collect();
                    let vectors = embedder
                        .embed_documents(&texts)
                        .await
                        .map_err(|e| Error::Embedding(e.to_string()))?;
                    if vectors.len() != batch.len() {
                        return Err(Error::Embedding(format!(
                            "embedder returned {} vectors for {} texts",
                            vectors.len(),
                            batch.len()
                        )));
                    }
                    // First batch reveals the dimensionality.
                    if offset == 0 {
                        self.ensure_index(vectors[0].len()).await?;
                    }
                    vectors
                }
            };

            let (payload, ids) = bulk_payload(&self.index_name, batch, &embeddings, offset);
            let response = self.client.bulk(payload).await?;
            if response.errors {
                let failed = response.failed().max(1);
                error!(
                    failed,
                    batch_start = offset,
                    "bulk write rejected documents, aborting ingestion"
                );
                pb.abandon();
                return Err(Error::BulkWrite {
                    batch_start: offset,
                    failed,
                    indexed: report.indexed,
                });
            }
            report.indexed += batch.len();
            report.chunk_ids.extend(ids);
            pb.inc(batch.len() as u64);
        }
        pb.finish_and_clear();

        info!(indexed = report.indexed, index = %self.index_name, "ingestion complete");
        Ok(report)
    }

    async fn search(
        &self,
        query: &str,
        source: QuerySource<'_>,
        opts: &SearchOptions,
    ) -> Result<Vec<SearchResult>> {
        if !self.client.index_exists(&self.index_name).await? {
            return Err(Error::NotReady);
        }
        let vector: Vec<f32> = match source {
            QuerySource::Vector(vector) => vector.to_vec(),
            QuerySource::Embedder(embedder) => embedder
                .embed_query(query)
                .await
                .map_err(|e| Error::Embedding(e.to_string()))?,
        };

        let body = query::search_body(query, &vector, opts);
        let pipeline = (opts.mode == SearchMode::Hybrid).then_some(schema::HYBRID_PIPELINE_ID);
        let response = self.client.search(&self.index_name, &body, pipeline).await?;

        let mut results = Vec::with_capacity(response.hits.hits.len());
        for hit in response.hits.hits {
            results.push(hit_to_result(hit)?);
        }
        debug!(count = results.len(), mode = ?opts.mode, "search complete");
        Ok(results)
    }

    async fn reset_index(&self) -> Result<()> {
        if self.client.index_exists(&self.index_name).await? {
            self.client.delete_index(&self.index_name).await?;
            info!(index = %self.index_name, "index deleted");
        } else {
            info!(index = %self.index_name, "index does not exist, nothing to delete");
        }
        clean_cache_dir(&self.cache_dir, &self.index_name);
        Ok(())
    }

    async fn is_populated(&self) -> Result<bool> {
        self.client.index_exists(&self.index_name).await
    }
}

/// Builds one newline-delimited bulk payload for a batch.
///
/// `offset` is the batch's start position in the overall sequence; ids are
/// derived from it so they do not depend on the batch size. The chunk id
/// doubles as the document `_id`, which turns re-ingestion into an
/// overwrite.
fn bulk_payload(
    index_name: &str,
    batch: &[Chunk],
    embeddings: &[Vec<f32>],
    offset: usize,
) -> (String, Vec<i64>) {
    let mut payload = String::new();
    let mut ids = Vec::with_capacity(batch.len());
    for (j, (chunk, embedding)) in batch.iter().zip(embeddings).enumerate() {
        let id = identity::chunk_id(&chunk.filename, &chunk.page_content, offset + j);
        ids.push(id);
        let action = json!({ "index": { "_index": index_name, "_id": id.to_string() } });
        let record = json!({
            "chunk_id": id,
            "embedding": embedding,
            "page_content": chunk.page_content,
            "filename": chunk.filename,
            "type": chunk.doc_type,
            "source": chunk.source,
            "language": chunk.language,
        });
        payload.push_str(&action.to_string());
        payload.push('\n');
        payload.push_str(&record.to_string());
        payload.push('\n');
    }
    (payload, ids)
}

/// Projects an engine hit into the uniform result shape, attaching the
/// fused or raw relevance under the single `score` key.
fn hit_to_result(hit: Hit) -> Result<SearchResult> {
    let mut result: SearchResult = serde_json::from_value(hit.source)?;
    result.score = hit.score.unwrap_or_default();
    Ok(result)
}

/// Removes every cache entry whose name starts with the index name.
/// Failures are logged per path and skipped; cleanup never aborts a reset.
fn clean_cache_dir(cache_dir: &Path, index_name: &str) {
    let entries = match std::fs::read_dir(cache_dir) {
        Ok(entries) => entries,
        Err(_) => {
            debug!(dir = %cache_dir.display(), "no local cache directory to clean");
            return;
        }
    };
    let mut removed = 0usize;
    for entry in entries.flatten() {
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if !name.starts_with(index_name) {
            continue;
        }
        let path = entry.path();
        let outcome = if path.is_dir() {
            std::fs::remove_dir_all(&path)
        } else {
            std::fs::remove_file(&path)
        };
        match outcome {
            Ok(()) => removed += 1,
            Err(e) => error!(path = %path.display(), "failed to remove cache entry: {e}"),
        }
    }
    if removed > 0 {
        info!(removed, "local cache cleaned up");
    } else {
        debug!("local cache already clean");
    }
}
