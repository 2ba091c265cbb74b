//! `cbam-assistant chat` — interactive chat with price controls.

use std::io::Write;

use chrono::NaiveDate;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use cbam_agent::TurnOutcome;
use cbam_config::AppConfig;
use cbam_core::pricing::{PriceSource, DEFAULT_EMISSION_FACTORS, RECENT_PRICES};

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let mut session = super::build_session(&config);
    info!(model = %config.model, "Starting interactive chat session");

    println!();
    println!("  CBAM Calculator & Documentation Assistant");
    println!("  Model: {}", config.model);
    println!();
    println!("  Ask about CBAM, emissions, or calculations.");
    println!("  Commands: /price <€>  /historic <date>  /prices  /reset  /clear  /factors");
    println!("  Type 'exit' or Ctrl+D to quit.");
    println!();
    print_price_status(&session);
    println!();

    let stdin = tokio::io::stdin();
    let mut lines = BufReader::new(stdin).lines();

    prompt_marker()?;
    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        if line.is_empty() {
            prompt_marker()?;
            continue;
        }

        if matches!(line.as_str(), "exit" | "quit" | "/exit" | "/quit") {
            break;
        }

        if let Some(command) = line.strip_prefix('/') {
            handle_command(&mut session, command);
            prompt_marker()?;
            continue;
        }

        match session.ask(&line).await {
            TurnOutcome::Calculated { reply } => {
                println!();
                print_indented(&reply);
                println!();
            }
            TurnOutcome::Answered { reply, source } => {
                println!();
                print_indented(&reply);
                println!("  Source: {source}");
                println!();
            }
            TurnOutcome::Failed { error } => {
                eprintln!("  [Error] LLM request failed: {error}");
                println!();
            }
        }

        prompt_marker()?;
    }

    info!(
        messages = session.conversation().messages.len(),
        "Chat session ended"
    );
    println!();
    println!("  Goodbye!");
    Ok(())
}

fn handle_command(session: &mut cbam_agent::ChatSession, command: &str) {
    let mut parts = command.split_whitespace();
    match parts.next() {
        Some("price") => match parts.next().map(str::parse::<f64>) {
            Some(Ok(price)) => match session.set_manual_price(price) {
                Ok(()) => print_price_status(session),
                Err(e) => eprintln!("  [Warning] {e}"),
            },
            _ => eprintln!("  Usage: /price <€/tCO₂e>"),
        },
        Some("historic") => match parts.next().map(str::parse::<NaiveDate>) {
            Some(Ok(date)) => match session.select_historic_date(date) {
                Ok(()) => print_price_status(session),
                Err(e) => eprintln!("  [Warning] {e}"),
            },
            _ => eprintln!("  Usage: /historic <YYYY-MM-DD>"),
        },
        Some("prices") => {
            println!("  Historical EU ETS prices:");
            for (date, price) in RECENT_PRICES {
                println!("    {date}  €{price:.2}");
            }
        }
        Some("reset") => {
            session.reset_price();
            print_price_status(session);
        }
        Some("clear") => {
            session.clear_conversation();
            println!("  Conversation cleared.");
        }
        Some("factors") => {
            println!("  Default emission factors (tCO₂e/tonne), used when actual");
            println!("  emissions are not supplied:");
            for (product, factor) in DEFAULT_EMISSION_FACTORS {
                println!("    {product:<12} {factor}");
            }
        }
        _ => eprintln!("  Unknown command: /{command}"),
    }
}

fn print_price_status(session: &cbam_agent::ChatSession) {
    let price = session.price();
    match price.source() {
        PriceSource::Default => {
            println!("  Current EU ETS price: €{:.2}/tCO₂e (default market price)", price.current());
        }
        PriceSource::Manual => {
            println!("  Current EU ETS price: €{:.2}/tCO₂e (manual override)", price.current());
        }
        PriceSource::Historic { date } => {
            println!("  Current EU ETS price: €{:.2}/tCO₂e (historic, {date})", price.current());
        }
    }
}

fn print_indented(text: &str) {
    for line in text.lines() {
        println!("  {line}");
    }
}

fn prompt_marker() -> std::io::Result<()> {
    print!("  You > ");
    std::io::stdout().flush()
}
