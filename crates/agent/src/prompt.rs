//! Deterministic prompt assembly for the slow path.
//!
//! The template's structure and ordering are load-bearing: the downstream
//! model expects the role line, tagged context/history/question blocks, and
//! the numbered instruction block in exactly this order. Keep changes to
//! wording inside the existing skeleton.

use cbam_core::message::Message;
use cbam_core::pricing::DEFAULT_EMISSION_FACTORS;
use cbam_core::search::RetrievalResult;

/// How many window messages are formatted into the history block.
const HISTORY_LINES: usize = 3;

/// Assemble the full instruction-formatted prompt for one turn.
///
/// `window` is the recent-history slice excluding the question currently
/// being answered; only its last three messages are included.
pub fn build_prompt(
    question: &str,
    retrieval: &RetrievalResult,
    window: &[Message],
    price: f64,
) -> String {
    let history = format_history(window);
    let factors = factors_inline();

    format!(
        "You are a CBAM specialist. Answer concisely using the supplied docs.\n\
        <context>\n\
        {context}\n\
        Current EU ETS Carbon Price: €{price:.2}/tonne CO₂e\n\
        </context>\n\
        <chat_history>\n\
        {history}\n\
        </chat_history>\n\
        <question>\n\
        {question}\n\
        </question>\n\
        <instructions>\n\
        1. Cite values/formulas from the docs.\n\
        2. For calculations:\n\
        \x20  - Default emission factors: {factors}\n\
        \x20  - Formula: CBAM Cost = (Embedded Emissions tCO₂e) × (EU ETS €{price:.2} – Origin price)\n\
        3. Keep < 150 words unless calculation needs detail.\n\
        4. Structure: Answer → Requirements → Calculation → Limitations\n\
        5. If data missing, say what is needed.\n\
        </instructions>\n\
        Response:",
        context = retrieval.context,
    )
}

/// Format the last three window messages as `role: content`, one per line.
fn format_history(window: &[Message]) -> String {
    let start = window.len().saturating_sub(HISTORY_LINES);
    window[start..]
        .iter()
        .map(|m| format!("{}: {}", m.role.label(), m.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// The default emission-factor table rendered inline, in table order.
fn factors_inline() -> String {
    let entries = DEFAULT_EMISSION_FACTORS
        .iter()
        .map(|(name, factor)| format!("{name}: {factor}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{{{entries}}}")
}
