//! # CBAM Core
//!
//! Domain types, traits, and error definitions for the CBAM assistant.
//! This crate has **zero framework dependencies** — it defines the domain
//! model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! The two hosted capabilities the assistant consumes — document search and
//! LLM completion — are defined as traits here. Implementations live in their
//! respective crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod completion;
pub mod error;
pub mod message;
pub mod pricing;
pub mod request;
pub mod search;

// Re-export key types at crate root for ergonomics
pub use completion::CompletionService;
pub use error::{CompletionError, Error, PriceError, Result, SearchError};
pub use message::{Conversation, ConversationId, Message, Role};
pub use pricing::{CarbonPriceState, PriceSource, DEFAULT_CARBON_PRICE};
pub use request::ParsedRequest;
pub use search::{RetrievalResult, SearchHit, SearchService};
