//! The LLM completion capability boundary.
//!
//! One call in, one answer out. Transient failures (network, quota) are a
//! single catchable error kind — retry policy lives in the client wrapper,
//! not here.

use async_trait::async_trait;

use crate::error::CompletionError;

/// The LLM completion capability.
///
/// Implementations: the hosted HTTP service in `cbam-providers`, mocks in
/// tests. The prompt is a single pre-assembled instruction string; chat
/// structure is encoded in the prompt text, not in the call.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// A human-readable name for this service (e.g. "cortex").
    fn name(&self) -> &str;

    /// Generate a completion for `prompt` using `model`.
    async fn complete(&self, model: &str, prompt: &str) -> Result<String, CompletionError>;
}
