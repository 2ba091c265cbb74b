//! The conversation orchestrator.
//!
//! Per-turn control flow: append the question, try the calculator fast
//! path, else retrieve context, assemble the prompt, and call the LLM.
//! The slow path is never attempted once the fast path answered — the
//! short-circuit avoids unnecessary external calls.

use chrono::NaiveDate;
use tracing::info;

use cbam_calculator::{classify, fast_path};
use cbam_core::error::PriceError;
use cbam_core::message::{Conversation, Message};
use cbam_core::pricing::CarbonPriceState;
use cbam_providers::CompletionClient;
use cbam_retrieval::Retriever;

use crate::prompt::build_prompt;

/// How one turn ended.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// Fast path: answered by the deterministic calculator.
    Calculated { reply: String },

    /// Slow path: answered by the LLM, with the top retrieval source.
    Answered { reply: String, source: String },

    /// Slow path failed after retries. No assistant message was recorded;
    /// the error is surfaced to the caller exactly once.
    Failed { error: String },
}

/// One user session: conversation history, price state, and the service
/// clients whose throttle state is scoped to this session.
///
/// Sessions are not shared. Serving many users means one `ChatSession`
/// per user, which is why no locking appears here.
pub struct ChatSession {
    model: String,
    history_length: usize,
    conversation: Conversation,
    price: CarbonPriceState,
    retriever: Retriever,
    completion: CompletionClient,
}

impl ChatSession {
    pub fn new(
        config: &cbam_config::AppConfig,
        retriever: Retriever,
        completion: CompletionClient,
    ) -> Self {
        Self {
            model: config.model.clone(),
            history_length: config.conversation.history_length,
            conversation: Conversation::new(),
            price: CarbonPriceState::new(),
            retriever,
            completion,
        }
    }

    /// Answer one question. Runs to completion (including throttle and
    /// backoff waits) before the session accepts the next turn.
    pub async fn ask(&mut self, question: &str) -> TurnOutcome {
        self.conversation.push(Message::user(question));

        // Fast path: closed-form calculation, no external calls.
        let request = classify(question);
        if let Some(calc) = fast_path(&request, self.price.current()) {
            let reply = calc.report();
            self.conversation.push(Message::assistant(reply.clone()));
            info!(conversation = %self.conversation.id, "turn answered by calculator");
            return TurnOutcome::Calculated { reply };
        }

        // Slow path: retrieval → prompt → completion.
        let retrieval = self.retriever.retrieve(question).await;
        let prompt = build_prompt(
            question,
            &retrieval,
            self.conversation.window(self.history_length),
            self.price.current(),
        );

        match self.completion.complete(&self.model, &prompt).await {
            Ok(answer) => {
                self.conversation.push(Message::assistant(answer.clone()));
                info!(
                    conversation = %self.conversation.id,
                    source = %retrieval.source,
                    "turn answered by LLM"
                );
                TurnOutcome::Answered {
                    reply: answer,
                    source: retrieval.source,
                }
            }
            Err(e) => TurnOutcome::Failed {
                error: e.to_string(),
            },
        }
    }

    // --- Price actions ---

    /// Manual price override (rejected while a historic date is active).
    pub fn set_manual_price(&mut self, price: f64) -> Result<(), PriceError> {
        self.price.set_manual(price)
    }

    /// Select a recorded historic date.
    pub fn select_historic_date(&mut self, date: NaiveDate) -> Result<(), PriceError> {
        self.price.select_historic(date)
    }

    /// Restore the default market price.
    pub fn reset_price(&mut self) {
        self.price.reset();
    }

    /// Reset the conversation to empty.
    pub fn clear_conversation(&mut self) {
        self.conversation.clear();
    }

    // --- Read access ---

    pub fn price(&self) -> &CarbonPriceState {
        &self.price
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }
}
