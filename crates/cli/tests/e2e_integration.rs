//! End-to-end integration tests for the CBAM assistant.
//!
//! These tests exercise the full pipeline from user question to turn
//! outcome, including classification, retrieval, prompt assembly, and
//! the throttled completion client.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cbam_agent::{ChatSession, TurnOutcome};
use cbam_config::AppConfig;
use cbam_core::error::{CompletionError, PriceError, SearchError};
use cbam_core::{CompletionService, SearchHit, SearchService};
use cbam_providers::CompletionClient;
use cbam_retrieval::Retriever;

// ── Mock services ────────────────────────────────────────────────────────

/// A search service that returns a fixed hit list, or fails.
struct FixedSearch {
    hits: Vec<SearchHit>,
    fail: bool,
}

impl FixedSearch {
    fn with_hits(hits: Vec<(&str, &str)>) -> Arc<Self> {
        Arc::new(Self {
            hits: hits
                .into_iter()
                .map(|(text, file)| SearchHit {
                    text: text.into(),
                    file_name: file.into(),
                })
                .collect(),
            fail: false,
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            hits: vec![],
            fail: true,
        })
    }
}

#[async_trait::async_trait]
impl SearchService for FixedSearch {
    fn name(&self) -> &str {
        "e2e_search"
    }

    async fn search(&self, _q: &str, limit: usize) -> Result<Vec<SearchHit>, SearchError> {
        if self.fail {
            return Err(SearchError::Network("connection refused".into()));
        }
        Ok(self.hits.iter().take(limit).cloned().collect())
    }
}

/// A completion service that returns scripted answers in sequence and
/// records every prompt it saw.
struct ScriptedCompletion {
    script: Mutex<VecDeque<Result<String, CompletionError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedCompletion {
    fn answering(answer: &str) -> Arc<Self> {
        Self::scripted(vec![Ok(answer.into())])
    }

    fn scripted(script: Vec<Result<String, CompletionError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn prompt_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait::async_trait]
impl CompletionService for ScriptedCompletion {
    fn name(&self) -> &str {
        "e2e_completion"
    }

    async fn complete(&self, _m: &str, prompt: &str) -> Result<String, CompletionError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(CompletionError::Network("script exhausted".into())))
    }
}

fn session(search: Arc<FixedSearch>, completion: Arc<ScriptedCompletion>) -> ChatSession {
    let config = AppConfig::default();
    let retriever = Retriever::new(search, config.retrieval.num_results);
    // Real delays would stall the test run under the default multi-second
    // intervals; the timing contracts have their own paused-time tests.
    let client = CompletionClient::new(completion, config.retries)
        .with_min_request_interval(Duration::ZERO)
        .with_retry_delay(Duration::ZERO);
    ChatSession::new(&config, retriever, client)
}

// ── E2E: calculator fast path ────────────────────────────────────────────

#[tokio::test]
async fn e2e_calculator_turn_produces_full_report() {
    let completion = ScriptedCompletion::answering("unused");
    let mut session = session(FixedSearch::failing(), completion.clone());

    // Phrased without "cost"/"paid"/"origin" so no origin price binds.
    let outcome = session
        .ask("Calculate CBAM for 100 tons of steel with 2.5 tCO2e/ton")
        .await;

    let reply = match outcome {
        TurnOutcome::Calculated { reply } => reply,
        other => panic!("expected Calculated, got {other:?}"),
    };

    // 100 t × 2.5 tCO₂e/t × €78.54 = €19,635.00 at the default price.
    assert!(reply.contains("CBAM Cost Calculation"));
    assert!(reply.contains("Steel"));
    assert!(reply.contains("€19,635.00"));
    assert!(reply.contains("Estimate only"));

    // The deterministic path made no external calls.
    assert_eq!(completion.prompt_count(), 0);
}

#[tokio::test]
async fn e2e_calculator_uses_session_price_overrides() {
    let mut session = session(
        FixedSearch::with_hits(vec![]),
        ScriptedCompletion::answering("unused"),
    );
    session.set_manual_price(80.0).unwrap();

    let outcome = session.ask("100 tons of steel").await;
    match outcome {
        // 100 × 2.3 × 80 = 18,400 with the table factor and manual price.
        TurnOutcome::Calculated { reply } => assert!(reply.contains("€18,400.00")),
        other => panic!("expected Calculated, got {other:?}"),
    }
}

// ── E2E: retrieval-augmented slow path ───────────────────────────────────

#[tokio::test]
async fn e2e_documentation_question_flows_through_llm() {
    let completion = ScriptedCompletion::answering(
        "CBAM reports are due quarterly during the transitional period.",
    );
    let mut session = session(
        FixedSearch::with_hits(vec![
            ("Reporting obligations apply quarterly.", "cbam_regulation.pdf"),
            ("The transitional period runs to 2026.", "guidance.pdf"),
        ]),
        completion.clone(),
    );

    let outcome = session.ask("When are CBAM reports due?").await;
    match outcome {
        TurnOutcome::Answered { reply, source } => {
            assert!(reply.contains("quarterly"));
            assert_eq!(source, "cbam_regulation.pdf");
        }
        other => panic!("expected Answered, got {other:?}"),
    }

    let prompt = completion.last_prompt().unwrap();
    assert!(prompt.contains("Reporting obligations apply quarterly."));
    assert!(prompt.contains("<question>\nWhen are CBAM reports due?\n</question>"));
    assert!(prompt.contains("Current EU ETS Carbon Price: €78.54/tonne CO₂e"));
}

#[tokio::test]
async fn e2e_multi_turn_history_reaches_the_prompt() {
    let completion = ScriptedCompletion::scripted(vec![
        Ok("It stands for Carbon Border Adjustment Mechanism.".into()),
        Ok("It phases in from 2026.".into()),
    ]);
    let mut session = session(FixedSearch::with_hits(vec![]), completion.clone());

    session.ask("What does CBAM stand for?").await;
    session.ask("And when does it start?").await;

    let prompt = completion.last_prompt().unwrap();
    assert!(prompt.contains("user: What does CBAM stand for?"));
    assert!(prompt.contains("assistant: It stands for Carbon Border Adjustment Mechanism."));
}

#[tokio::test]
async fn e2e_search_outage_degrades_but_still_answers() {
    let completion = ScriptedCompletion::answering("Answer from model knowledge.");
    let mut session = session(FixedSearch::failing(), completion.clone());

    let outcome = session.ask("What is CBAM?").await;
    match outcome {
        TurnOutcome::Answered { source, .. } => assert_eq!(source, "Error"),
        other => panic!("expected Answered, got {other:?}"),
    }
}

#[tokio::test]
async fn e2e_completion_outage_fails_the_turn_only() {
    let completion = ScriptedCompletion::scripted(vec![
        Err(CompletionError::Network("down".into())),
        Err(CompletionError::Network("down".into())),
        Ok("Back up.".into()),
    ]);
    let mut session = session(FixedSearch::with_hits(vec![]), completion.clone());

    let first = session.ask("What is CBAM?").await;
    assert!(matches!(first, TurnOutcome::Failed { .. }));

    // The session stays usable; the next turn succeeds.
    let second = session.ask("What is CBAM?").await;
    assert!(matches!(second, TurnOutcome::Answered { .. }));
}

// ── E2E: price controls across turns ─────────────────────────────────────

#[tokio::test]
async fn e2e_historic_price_changes_the_calculation() {
    let mut session = session(
        FixedSearch::with_hits(vec![]),
        ScriptedCompletion::answering("unused"),
    );
    session
        .select_historic_date("2025-09-01".parse().unwrap())
        .unwrap();

    // Manual entry is locked out while the historic date is active.
    assert_eq!(session.set_manual_price(90.0), Err(PriceError::HistoricActive));

    let outcome = session.ask("100 tons of cement").await;
    match outcome {
        // 100 × 0.9 × 73.20 = 6,588.00
        TurnOutcome::Calculated { reply } => assert!(reply.contains("€6,588.00")),
        other => panic!("expected Calculated, got {other:?}"),
    }
}
