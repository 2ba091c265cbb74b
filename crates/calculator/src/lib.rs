//! The fast path: classify a free-text question into a structured CBAM
//! request and, when enough was extracted, answer it with the closed-form
//! cost calculation instead of a retrieval + LLM round trip.

pub mod classify;
pub mod cost;
pub mod report;

pub use classify::classify;
pub use cost::compute_cost;
pub use report::{fast_path, Calculation};
