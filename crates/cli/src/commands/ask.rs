//! `cbam-assistant ask` — single-question mode.

use cbam_agent::TurnOutcome;
use cbam_config::AppConfig;
use tracing::info;

pub async fn run(question: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let mut session = super::build_session(&config);
    info!(model = %config.model, "Answering single question");

    match session.ask(question).await {
        TurnOutcome::Calculated { reply } => {
            println!("{reply}");
        }
        TurnOutcome::Answered { reply, source } => {
            println!("{reply}");
            println!();
            println!("Source: {source}");
        }
        TurnOutcome::Failed { error } => {
            return Err(format!("LLM request failed: {error}").into());
        }
    }

    Ok(())
}
