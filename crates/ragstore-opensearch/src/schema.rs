//! Engine-side bodies: index settings/mappings and the hybrid scoring
//! pipeline. The schema is fixed at index creation and never altered.

use serde_json::{json, Value};

/// Query-time candidate list size for the knn graph.
pub const EF_SEARCH: u32 = 100;
/// HNSW construction-time candidate list size.
pub const EF_CONSTRUCTION: u32 = 128;
/// HNSW graph degree.
pub const HNSW_M: u32 = 24;

/// Identifier the hybrid scoring pipeline is registered under.
pub const HYBRID_PIPELINE_ID: &str = "hybrid_pipeline";
/// Weight of the dense branch in hybrid combination.
pub const DENSE_WEIGHT: f64 = 0.3;
/// Weight of the sparse branch in hybrid combination.
pub const SPARSE_WEIGHT: f64 = 0.7;

/// Index body for a given embedding dimensionality.
///
/// `chunk_id` is a long so the derived 63-bit identifiers round-trip;
/// `page_content` gets standard full-text analysis; the remaining metadata
/// fields are exact-match keywords.
pub fn index_body(dim: usize) -> Value {
    json!({
        "settings": {
            "index": {
                "knn": true,
                "knn.algo_param.ef_search": EF_SEARCH,
            }
        },
        "mappings": {
            "properties": {
                "chunk_id": { "type": "long" },
                "embedding": {
                    "type": "knn_vector",
                    "dimension": dim,
                    "method": {
                        "name": "hnsw",
                        "space_type": "cosinesimil",
                        "engine": "lucene",
                        "parameters": {
                            "ef_construction": EF_CONSTRUCTION,
                            "m": HNSW_M,
                        }
                    }
                },
                "page_content": {
                    "type": "text",
                    "analyzer": "standard",
                },
                "filename": { "type": "keyword" },
                "type": { "type": "keyword" },
                "source": { "type": "keyword" },
                "language": { "type": "keyword" },
            }
        }
    })
}

/// Pipeline that normalizes each hybrid branch to a common scale (min-max)
/// and merges them with a weighted arithmetic mean.
pub fn hybrid_pipeline_body() -> Value {
    json!({
        "description": "Post-processor for hybrid search",
        "phase_results_processors": [
            {
                "normalization-processor": {
                    "normalization": { "technique": "min_max" },
                    "combination": {
                        "technique": "arithmetic_mean",
                        "parameters": {
                            "weights": [DENSE_WEIGHT, SPARSE_WEIGHT],
                        }
                    }
                }
            }
        ]
    })
}
