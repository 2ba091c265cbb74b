//! Per-session orchestration for the CBAM assistant.
//!
//! A `ChatSession` owns everything one user session mutates — conversation
//! history, carbon price state, and the completion throttle marker — so
//! nothing is ambient or shared across sessions. Each turn runs to
//! completion before the next question is accepted.

pub mod prompt;
pub mod session;

#[cfg(test)]
mod test_helpers;

pub use prompt::build_prompt;
pub use session::{ChatSession, TurnOutcome};
