//! Error types for the CBAM assistant domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant. Note that per the
//! turn-scoped recovery policy, none of these are fatal to the process:
//! search failures degrade the turn, completion failures end the turn,
//! price failures reject the user action.

use thiserror::Error;

/// The top-level error type for all CBAM assistant operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Document search errors ---
    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    // --- LLM completion errors ---
    #[error("Completion error: {0}")]
    Completion(#[from] CompletionError),

    // --- Carbon price state errors ---
    #[error("Price error: {0}")]
    Price(#[from] PriceError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Errors from the hosted document-search capability.
#[derive(Debug, Clone, Error)]
pub enum SearchError {
    #[error("Search request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed search response: {0}")]
    InvalidResponse(String),
}

/// Errors from the hosted LLM completion capability.
#[derive(Debug, Clone, Error)]
pub enum CompletionError {
    #[error("Completion request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed completion response: {0}")]
    InvalidResponse(String),
}

/// Errors from carbon price state transitions (rejected user actions).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PriceError {
    #[error("Price must be > 0 (got €{0:.2})")]
    NonPositive(f64),

    #[error("Price must be ≤ €{ceiling:.2} (got €{price:.2})")]
    AboveCeiling { price: f64, ceiling: f64 },

    #[error("Manual entry is disabled while a historic date is selected")]
    HistoricActive,

    #[error("No historic price recorded for {0}")]
    UnknownDate(chrono::NaiveDate),
}
