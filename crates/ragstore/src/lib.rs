//! Backend selection for the vector store.
//!
//! The capability contract lives in `ragstore-core`; this crate picks and
//! constructs the configured implementation. Adding a backend means adding
//! a crate that implements `VectorStore` and one arm to the match below.

use std::sync::Arc;

use ragstore_core::config::OpenSearchConfig;
use ragstore_core::error::{Error, Result};
use ragstore_core::traits::VectorStore;
use ragstore_opensearch::OpenSearchStore;

pub use ragstore_core::{config, error, identity, traits, types};
pub use ragstore_opensearch as opensearch;

/// Environment key selecting the backend.
pub const VECTOR_STORE_TYPE: &str = "VECTOR_STORE_TYPE";
const DEFAULT_BACKEND: &str = "OPENSEARCH";

/// Builds the backend named by `VECTOR_STORE_TYPE`, defaulting to
/// OPENSEARCH, with its configuration resolved from the environment.
pub async fn vector_store_from_env() -> Result<Arc<dyn VectorStore>> {
    let backend =
        std::env::var(VECTOR_STORE_TYPE).unwrap_or_else(|_| DEFAULT_BACKEND.to_string());
    vector_store_for(&backend).await
}

/// Builds the named backend. Unrecognized names are fatal.
pub async fn vector_store_for(backend: &str) -> Result<Arc<dyn VectorStore>> {
    match backend.to_uppercase().as_str() {
        "OPENSEARCH" => {
            let config =
                OpenSearchConfig::load().map_err(|e| Error::InvalidArgument(e.to_string()))?;
            Ok(Arc::new(OpenSearchStore::connect(config).await?))
        }
        other => Err(Error::UnsupportedBackend(other.to_string())),
    }
}
