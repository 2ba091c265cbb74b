//! HTTP client for the hosted document-search service.
//!
//! The service applies its own relevance ranking; we only ask for the top
//! `limit` matches of the configured collection and hand back `{text,
//! file_name}` pairs in ranked order.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use cbam_core::error::SearchError;
use cbam_core::search::{SearchHit, SearchService};

/// Search-service client over a fixed indexed collection.
pub struct DocumentSearchClient {
    name: String,
    base_url: String,
    collection: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl DocumentSearchClient {
    /// Create a new client scoped to one collection.
    pub fn new(base_url: impl Into<String>, collection: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            name: "document-search".into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            collection: collection.into(),
            api_key: None,
            client,
        }
    }

    /// Attach an API key sent as a Bearer token.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

#[async_trait]
impl SearchService for DocumentSearchClient {
    fn name(&self) -> &str {
        &self.name
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, SearchError> {
        let url = format!("{}/collections/{}/query", self.base_url, self.collection);

        let body = QueryRequest {
            query,
            columns: &["text", "file_name"],
            limit,
        };

        debug!(collection = %self.collection, limit, "Sending search request");

        let mut request = self.client.post(&url).json(&body);
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SearchError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Search service error");
            return Err(SearchError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_resp: QueryResponse = response
            .json()
            .await
            .map_err(|e| SearchError::InvalidResponse(e.to_string()))?;

        Ok(api_resp
            .results
            .into_iter()
            .map(|r| SearchHit {
                text: r.text,
                file_name: r.file_name,
            })
            .collect())
    }
}

// --- Search service API types ---

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    query: &'a str,
    columns: &'a [&'a str],
    limit: usize,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    results: Vec<QueryResult>,
}

#[derive(Debug, Deserialize)]
struct QueryResult {
    #[serde(default)]
    text: String,
    #[serde(default)]
    file_name: String,
}
