use async_trait::async_trait;
use shared::domain::ChatMessage;

/// Produces the assistant's reply to a query. `history` already contains
/// the user message being answered.
#[async_trait]
pub trait Responder: Send + Sync {
    async fn respond(&self, query: &str, history: &[ChatMessage]) -> anyhow::Result<String>;
}

/// Repeats the query back. Stands in for a model-backed assistant.
#[derive(Debug, Clone, Default)]
pub struct EchoResponder;

#[async_trait]
impl Responder for EchoResponder {
    async fn respond(&self, query: &str, _history: &[ChatMessage]) -> anyhow::Result<String> {
        Ok(format!("You said: {query}"))
    }
}
