use figment::{providers::Serialized, Figment};
use serde_json::json;

use ragstore_core::config::OpenSearchConfig;
use ragstore_core::identity;
use ragstore_core::types::{Chunk, SearchMode, SearchOptions, SearchResult};

#[test]
fn config_defaults() {
    let figment = Figment::from(Serialized::defaults(OpenSearchConfig::default()));
    let config = OpenSearchConfig::from_figment(figment).expect("extract");

    assert_eq!(config.host, "localhost");
    assert_eq!(config.port, 9200);
    assert_eq!(config.db_prefix, "rag");
    assert_eq!(config.index_name, "default");
    assert!(config.use_ssl);
    assert!(!config.verify_certs);
}

#[test]
fn config_overrides_are_lowercased() {
    let figment = Figment::from(Serialized::defaults(OpenSearchConfig::default()))
        .merge(Serialized::defaults(json!({
            "host": "search.internal",
            "port": 9201,
            "db_prefix": "Corpus",
            "index_name": "FieldGuides",
        })));
    let config = OpenSearchConfig::from_figment(figment).expect("extract");

    assert_eq!(config.host, "search.internal");
    assert_eq!(config.port, 9201);
    assert_eq!(config.db_prefix, "corpus");
    assert_eq!(config.index_name, "fieldguides");
}

#[test]
fn config_reads_prefixed_env() {
    std::env::set_var("OPENSEARCH_HOST", "env-host");
    std::env::set_var("OPENSEARCH_INDEX_NAME", "EnvIndex");
    let config = OpenSearchConfig::load().expect("load");
    std::env::remove_var("OPENSEARCH_HOST");
    std::env::remove_var("OPENSEARCH_INDEX_NAME");

    assert_eq!(config.host, "env-host");
    assert_eq!(config.index_name, "envindex");
}

#[test]
fn physical_index_name_is_prefix_plus_digest() {
    let config = OpenSearchConfig { db_prefix: "rag".into(), ..Default::default() };
    let name = config.physical_index_name();
    assert!(name.starts_with("rag_"));
    assert_eq!(name.len(), "rag_".len() + 32);
    // same logical name, same physical name
    assert_eq!(name, config.physical_index_name());
}

#[test]
fn chunk_ids_do_not_depend_on_batch_partitioning() {
    let chunks: Vec<Chunk> = (0..25)
        .map(|i| Chunk {
            page_content: format!("paragraph number {}", i),
            filename: "manual.txt".to_string(),
            ..Default::default()
        })
        .collect();

    let derive_all = |batch_size: usize| -> Vec<i64> {
        let mut ids = Vec::new();
        for (batch_no, batch) in chunks.chunks(batch_size).enumerate() {
            for (j, chunk) in batch.iter().enumerate() {
                ids.push(identity::chunk_id(
                    &chunk.filename,
                    &chunk.page_content,
                    batch_no * batch_size + j,
                ));
            }
        }
        ids
    };

    assert_eq!(derive_all(10), derive_all(25));
    assert_eq!(derive_all(10).len(), 25);
}

#[test]
fn chunk_metadata_field_serializes_as_type() {
    let chunk = Chunk {
        page_content: "seed saving".into(),
        filename: "garden.txt".into(),
        doc_type: "howto".into(),
        ..Default::default()
    };
    let value = serde_json::to_value(&chunk).expect("serialize");
    assert_eq!(value["type"], "howto");
    assert!(value.get("doc_type").is_none());
}

#[test]
fn search_result_decodes_engine_source() {
    let source = json!({
        "chunk_id": 42,
        "page_content": "smoke the meat over low heat",
        "filename": "preserving.txt",
        "type": "howto",
        "source": "library",
        "language": "en",
    });
    let result: SearchResult = serde_json::from_value(source).expect("decode");
    assert_eq!(result.chunk_id, 42);
    assert_eq!(result.doc_type, "howto");
    assert_eq!(result.score, 0.0);
}

#[test]
fn default_search_options_use_hybrid() {
    let opts = SearchOptions::default();
    assert_eq!(opts.mode, SearchMode::Hybrid);
    assert_eq!(opts.top_k, 5);
    assert!(opts.language.is_none());
}
