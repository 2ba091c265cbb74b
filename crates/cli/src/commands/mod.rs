pub mod ask;
pub mod chat;
pub mod config_cmd;

use cbam_agent::ChatSession;
use cbam_config::AppConfig;

/// Build a fresh session (retriever + throttled completion client) from the
/// loaded configuration.
pub fn build_session(config: &AppConfig) -> ChatSession {
    let retriever = cbam_retrieval::build_from_config(config);
    let completion = cbam_providers::build_from_config(config);
    ChatSession::new(config, retriever, completion)
}
