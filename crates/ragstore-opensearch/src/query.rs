//! Query-body construction for the three retrieval modes.
//!
//! All builders are pure: the store embeds the query text first and passes
//! the vector in. Candidate retrieval over-fetches by `CANDIDATE_FACTOR`
//! so the fusion/ranking step has enough candidates to re-rank from; only
//! the hybrid body truncates to `top_k` server-side.

use serde_json::{json, Value};

use ragstore_core::types::{SearchMode, SearchOptions};

/// Over-fetch factor applied to `top_k` before fusion or truncation.
pub const CANDIDATE_FACTOR: usize = 3;

/// Fields projected back for every hit, identical across modes.
const SOURCE_FIELDS: [&str; 6] =
    ["chunk_id", "page_content", "filename", "type", "source", "language"];

pub fn search_body(query: &str, vector: &[f32], opts: &SearchOptions) -> Value {
    match opts.mode {
        SearchMode::Dense => dense_body(vector, opts),
        SearchMode::Sparse => sparse_body(query, opts),
        SearchMode::Hybrid => hybrid_body(query, vector, opts),
    }
}

/// Exact-match language filter, or `None` when no language is set.
/// The same filter feeds both hybrid branches so their candidate sets
/// agree on scope.
fn language_filter(opts: &SearchOptions) -> Option<Value> {
    match opts.language.as_deref() {
        Some(language) if !language.is_empty() => {
            Some(json!({ "term": { "language": language } }))
        }
        _ => None,
    }
}

fn knn_clause(vector: &[f32], limit: usize, filter: Option<&Value>) -> Value {
    let mut embedding = json!({ "vector": vector, "k": limit });
    if let Some(filter) = filter {
        embedding["filter"] = filter.clone();
    }
    json!({ "knn": { "embedding": embedding } })
}

fn match_clause(query: &str, filter: Option<&Value>) -> Value {
    let mut clause = json!({ "must": [ { "match": { "page_content": query } } ] });
    if let Some(filter) = filter {
        clause["filter"] = json!([filter]);
    }
    json!({ "bool": clause })
}

fn dense_body(vector: &[f32], opts: &SearchOptions) -> Value {
    let limit = opts.top_k * CANDIDATE_FACTOR;
    json!({
        "size": limit,
        "_source": SOURCE_FIELDS,
        "query": knn_clause(vector, limit, language_filter(opts).as_ref()),
    })
}

fn sparse_body(query: &str, opts: &SearchOptions) -> Value {
    let limit = opts.top_k * CANDIDATE_FACTOR;
    json!({
        "size": limit,
        "_source": SOURCE_FIELDS,
        "query": match_clause(query, language_filter(opts).as_ref()),
    })
}

/// One combined query holding the dense and sparse branches; the registered
/// pipeline normalizes and merges their scores, then truncates to `top_k`.
fn hybrid_body(query: &str, vector: &[f32], opts: &SearchOptions) -> Value {
    let limit = opts.top_k * CANDIDATE_FACTOR;
    let filter = language_filter(opts);
    json!({
        "size": opts.top_k,
        "_source": SOURCE_FIELDS,
        "query": {
            "hybrid": {
                "queries": [
                    knn_clause(vector, limit, filter.as_ref()),
                    match_clause(query, filter.as_ref()),
                ]
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(mode: SearchMode, top_k: usize, language: Option<&str>) -> SearchOptions {
        SearchOptions { top_k, mode, language: language.map(str::to_string) }
    }

    #[test]
    fn dense_body_overfetches_and_filters() {
        let body = search_body("q", &[0.1, 0.2], &opts(SearchMode::Dense, 5, Some("en")));
        assert_eq!(body["size"], 15);
        let embedding = &body["query"]["knn"]["embedding"];
        assert_eq!(embedding["k"], 15);
        assert_eq!(embedding["filter"]["term"]["language"], "en");
    }

    #[test]
    fn dense_body_omits_filter_without_language() {
        let body = search_body("q", &[0.1], &opts(SearchMode::Dense, 5, None));
        assert!(body["query"]["knn"]["embedding"].get("filter").is_none());

        let body = search_body("q", &[0.1], &opts(SearchMode::Dense, 5, Some("")));
        assert!(body["query"]["knn"]["embedding"].get("filter").is_none());
    }

    #[test]
    fn sparse_body_matches_page_content() {
        let body = search_body("root cellar", &[], &opts(SearchMode::Sparse, 2, Some("en")));
        assert_eq!(body["size"], 6);
        assert_eq!(body["query"]["bool"]["must"][0]["match"]["page_content"], "root cellar");
        assert_eq!(body["query"]["bool"]["filter"][0]["term"]["language"], "en");
    }

    #[test]
    fn sparse_body_omits_filter_without_language() {
        let body = search_body("q", &[], &opts(SearchMode::Sparse, 2, None));
        assert!(body["query"]["bool"].get("filter").is_none());
    }

    #[test]
    fn hybrid_body_carries_both_branches_and_truncates_to_top_k() {
        let body = search_body("cider press", &[0.5], &opts(SearchMode::Hybrid, 4, Some("de")));
        assert_eq!(body["size"], 4);
        let branches = body["query"]["hybrid"]["queries"].as_array().expect("branches");
        assert_eq!(branches.len(), 2);
        assert_eq!(branches[0]["knn"]["embedding"]["k"], 12);
        assert_eq!(branches[1]["bool"]["must"][0]["match"]["page_content"], "cider press");
        // the same filter scopes both branches
        assert_eq!(branches[0]["knn"]["embedding"]["filter"]["term"]["language"], "de");
        assert_eq!(branches[1]["bool"]["filter"][0]["term"]["language"], "de");
    }

    #[test]
    fn hybrid_body_applies_filter_to_neither_branch_without_language() {
        let body = search_body("q", &[0.5], &opts(SearchMode::Hybrid, 4, None));
        let branches = body["query"]["hybrid"]["queries"].as_array().expect("branches");
        assert!(branches[0]["knn"]["embedding"].get("filter").is_none());
        assert!(branches[1]["bool"].get("filter").is_none());
    }

    #[test]
    fn all_modes_project_the_same_source_fields() {
        for mode in [SearchMode::Dense, SearchMode::Sparse, SearchMode::Hybrid] {
            let body = search_body("q", &[0.1], &opts(mode, 3, None));
            assert_eq!(body["_source"], json!(SOURCE_FIELDS));
        }
    }
}
