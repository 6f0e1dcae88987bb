//! Thin typed surface over the engine's REST API.
//!
//! One pooled HTTP client per store, reused across all operations. Non-2xx
//! responses become `Error::Engine`; nothing here retries.

use std::time::Duration;

use reqwest::{Client, Method, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;

use ragstore_core::config::OpenSearchConfig;
use ragstore_core::error::{Error, Result};

pub struct EngineClient {
    http: Client,
    base_url: String,
    username: String,
    password: String,
}

impl EngineClient {
    pub fn new(config: &OpenSearchConfig) -> Result<Self> {
        let scheme = if config.use_ssl { "https" } else { "http" };
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(!config.verify_certs)
            .build()?;
        Ok(Self {
            http,
            base_url: format!("{}://{}:{}", scheme, config.host, config.port),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let builder = self.http.request(method, format!("{}{}", self.base_url, path));
        if self.username.is_empty() {
            builder
        } else {
            builder.basic_auth(&self.username, Some(&self.password))
        }
    }

    async fn check(&self, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(engine_error(status, response).await)
        }
    }

    pub async fn index_exists(&self, index: &str) -> Result<bool> {
        let response = self.request(Method::HEAD, &format!("/{}", index)).send().await?;
        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(engine_error(status, response).await),
        }
    }

    pub async fn create_index(&self, index: &str, body: &Value) -> Result<()> {
        let response = self.request(Method::PUT, &format!("/{}", index)).json(body).send().await?;
        self.check(response).await?;
        Ok(())
    }

    pub async fn delete_index(&self, index: &str) -> Result<()> {
        let response = self.request(Method::DELETE, &format!("/{}", index)).send().await?;
        self.check(response).await?;
        Ok(())
    }

    pub async fn put_search_pipeline(&self, id: &str, body: &Value) -> Result<()> {
        let response = self
            .request(Method::PUT, &format!("/_search/pipeline/{}", id))
            .json(body)
            .send()
            .await?;
        self.check(response).await?;
        Ok(())
    }

    /// Submits one newline-delimited bulk payload and decodes the per-item
    /// outcome summary.
    pub async fn bulk(&self, payload: String) -> Result<BulkResponse> {
        let response = self
            .request(Method::POST, "/_bulk")
            .header(reqwest::header::CONTENT_TYPE, "application/x-ndjson")
            .body(payload)
            .send()
            .await?;
        let response = self.check(response).await?;
        Ok(response.json().await?)
    }

    pub async fn search(
        &self,
        index: &str,
        body: &Value,
        pipeline: Option<&str>,
    ) -> Result<SearchResponse> {
        let mut builder = self.request(Method::POST, &format!("/{}/_search", index)).json(body);
        if let Some(pipeline) = pipeline {
            builder = builder.query(&[("search_pipeline", pipeline)]);
        }
        let response = self.check(builder.send().await?).await?;
        Ok(response.json().await?)
    }
}

async fn engine_error(status: StatusCode, response: Response) -> Error {
    let reason = response.text().await.unwrap_or_default();
    Error::Engine { status: status.as_u16(), reason }
}

/// Outcome of a `_bulk` request.
#[derive(Debug, Deserialize)]
pub struct BulkResponse {
    pub errors: bool,
    #[serde(default)]
    pub items: Vec<Value>,
}

impl BulkResponse {
    /// Number of items the engine rejected.
    pub fn failed(&self) -> usize {
        self.items
            .iter()
            .filter(|item| item.get("index").and_then(|action| action.get("error")).is_some())
            .count()
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub hits: Hits,
}

#[derive(Debug, Deserialize)]
pub struct Hits {
    #[serde(default)]
    pub hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
pub struct Hit {
    #[serde(rename = "_score")]
    pub score: Option<f32>,
    #[serde(rename = "_source")]
    pub source: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bulk_response_counts_rejected_items() {
        let response: BulkResponse = serde_json::from_value(json!({
            "took": 7,
            "errors": true,
            "items": [
                { "index": { "_id": "1", "status": 201 } },
                { "index": { "_id": "2", "status": 429, "error": { "type": "es_rejected_execution_exception" } } },
                { "index": { "_id": "3", "status": 200 } },
            ]
        }))
        .expect("decode");

        assert!(response.errors);
        assert_eq!(response.failed(), 1);
    }

    #[test]
    fn search_response_tolerates_missing_score() {
        let response: SearchResponse = serde_json::from_value(json!({
            "hits": { "hits": [ { "_source": { "chunk_id": 1 } } ] }
        }))
        .expect("decode");

        assert_eq!(response.hits.hits.len(), 1);
        assert!(response.hits.hits[0].score.is_none());
    }
}
