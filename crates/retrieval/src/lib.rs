//! Context retrieval for the slow path.
//!
//! `DocumentSearchClient` talks HTTP to the hosted document-search service;
//! `Retriever` turns ranked hits into a single sanitized context block for
//! the prompt assembler.

use std::sync::Arc;

pub mod client;
pub mod retriever;

pub use client::DocumentSearchClient;
pub use retriever::Retriever;

/// Build a retriever from the application config.
pub fn build_from_config(config: &cbam_config::AppConfig) -> Retriever {
    let mut client =
        DocumentSearchClient::new(&config.search.base_url, &config.search.collection);

    // Per-service key wins over the shared one.
    if let Some(key) = config.search.api_key.as_ref().or(config.api_key.as_ref()) {
        client = client.with_api_key(key);
    }

    Retriever::new(Arc::new(client), config.retrieval.num_results)
        .with_max_context_chars(config.retrieval.max_context_chars)
}
