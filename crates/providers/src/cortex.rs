//! HTTP client for the hosted completion service.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use cbam_core::completion::CompletionService;
use cbam_core::error::CompletionError;

const COMPLETE_PATH: &str = "/api/v2/cortex/inference:complete";

/// Client for the Cortex-style single-shot completion endpoint.
pub struct CortexCompletionService {
    name: String,
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl CortexCompletionService {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            name: "cortex".into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
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
impl CompletionService for CortexCompletionService {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, model: &str, prompt: &str) -> Result<String, CompletionError> {
        let url = format!("{}{}", self.base_url, COMPLETE_PATH);
        let body = CompleteRequest { model, prompt };

        debug!(model, prompt_chars = prompt.len(), "Sending completion request");

        let mut request = self.client.post(&url).json(&body);
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| CompletionError::Network(e.to_string()))?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(CompletionError::RateLimited {
                retry_after_secs: 5,
            });
        }
        if status == 401 || status == 403 {
            return Err(CompletionError::AuthenticationFailed(
                "Invalid completion service API key".into(),
            ));
        }
        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Completion service error");
            return Err(CompletionError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_resp: CompleteResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::InvalidResponse(e.to_string()))?;

        Ok(api_resp.completion)
    }
}

// --- Completion service API types ---

#[derive(Debug, Serialize)]
struct CompleteRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompleteResponse {
    completion: String,
}
