//! The document-search capability boundary.
//!
//! The assistant consumes a hosted, already-indexed document-search service
//! as a black box: it sends a query, gets back ranked passages. Relevance
//! scoring is the service's concern, not ours.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// Source name used when a search returns zero matches.
pub const NO_SOURCE: &str = "No source";

/// Source name used when the search call itself failed.
pub const ERROR_SOURCE: &str = "Error";

/// Maximum context length handed to the prompt assembler, in chars.
pub const MAX_CONTEXT_CHARS: usize = 8000;

/// One ranked match from the document-search service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    /// The passage text.
    pub text: String,

    /// Name of the file the passage came from.
    pub file_name: String,
}

/// Retrieved context for one slow-path turn. Ephemeral — recomputed per
/// turn, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalResult {
    /// Concatenated, sanitized, length-capped context text.
    pub context: String,

    /// Source file of the top-ranked match, or a sentinel.
    pub source: String,
}

impl RetrievalResult {
    /// The degraded result used when the search call fails: the turn
    /// continues with no retrieved context.
    pub fn degraded() -> Self {
        Self {
            context: String::new(),
            source: ERROR_SOURCE.into(),
        }
    }
}

/// The document-search capability.
///
/// Implementations: the hosted HTTP client in `cbam-retrieval`, mocks in
/// tests. Assumed idempotent-read with service-side relevance ranking.
#[async_trait]
pub trait SearchService: Send + Sync {
    /// A human-readable name for this service (e.g. "document-search").
    fn name(&self) -> &str;

    /// Return up to `limit` matches ranked by relevance.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, SearchError>;
}
