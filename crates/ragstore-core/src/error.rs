use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("index is empty, ingest documents first")]
    NotReady,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("bulk write rejected {failed} document(s) in batch starting at {batch_start}, {indexed} chunk(s) committed before the failure")]
    BulkWrite {
        batch_start: usize,
        failed: usize,
        indexed: usize,
    },

    #[error("embedding failed: {0}")]
    Embedding(String),

    #[error("unsupported vector store type: {0}")]
    UnsupportedBackend(String),

    #[error("engine returned {status}: {reason}")]
    Engine { status: u16, reason: String },

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
