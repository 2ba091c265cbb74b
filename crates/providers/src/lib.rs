//! LLM completion for the slow path.
//!
//! `CortexCompletionService` is the HTTP client for the hosted completion
//! capability; `CompletionClient` wraps any `CompletionService` with the
//! session-global throttle and bounded retry policy.

use std::sync::Arc;

pub mod client;
pub mod cortex;

pub use client::CompletionClient;
pub use cortex::CortexCompletionService;

/// Build a throttled completion client from the application config.
pub fn build_from_config(config: &cbam_config::AppConfig) -> CompletionClient {
    let mut service = CortexCompletionService::new(&config.completion.base_url);

    // Per-service key wins over the shared one.
    if let Some(key) = config
        .completion
        .api_key
        .as_ref()
        .or(config.api_key.as_ref())
    {
        service = service.with_api_key(key);
    }

    CompletionClient::new(Arc::new(service), config.retries)
        .with_min_request_interval(std::time::Duration::from_secs_f64(
            config.min_request_interval_secs,
        ))
        .with_retry_delay(std::time::Duration::from_secs(config.retry_delay_secs))
}
