use figment::{
    providers::{Env, Serialized},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::identity;

/// Connection and naming parameters for the OpenSearch backend.
///
/// All fields map 1:1 onto `OPENSEARCH_*` environment keys (`host` comes
/// from `OPENSEARCH_HOST` and so on); the exact keys are the configuration
/// contract. Collected into one immutable value so tests can inject
/// fixtures instead of mutating the process environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenSearchConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Index name prefix, lowercased after load.
    pub db_prefix: String,
    /// Logical index name, lowercased after load and hashed into the
    /// physical name.
    pub index_name: String,
    pub use_ssl: bool,
    pub verify_certs: bool,
    pub timeout_secs: u64,
    /// Directory holding local artifacts named after the physical index;
    /// `reset_index` cleans it.
    pub cache_dir: PathBuf,
}

impl Default for OpenSearchConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 9200,
            username: String::new(),
            password: String::new(),
            db_prefix: "rag".to_string(),
            index_name: "default".to_string(),
            use_ssl: true,
            verify_certs: false,
            timeout_secs: 60,
            cache_dir: PathBuf::from("cache"),
        }
    }
}

impl OpenSearchConfig {
    pub fn load() -> anyhow::Result<Self> {
        Self::from_figment(
            Figment::from(Serialized::defaults(Self::default()))
                .merge(Env::prefixed("OPENSEARCH_")),
        )
    }

    pub fn from_figment(figment: Figment) -> anyhow::Result<Self> {
        let mut config: Self = figment.extract()?;
        config.db_prefix = config.db_prefix.to_lowercase();
        config.index_name = config.index_name.to_lowercase();
        Ok(config)
    }

    /// Physical index name in the remote engine: `prefix + "_" + digest`.
    pub fn physical_index_name(&self) -> String {
        format!("{}_{}", self.db_prefix, identity::index_digest(&self.index_name))
    }
}
