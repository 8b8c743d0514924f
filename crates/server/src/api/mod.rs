//! In-memory assistant state shared by the HTTP handlers.

use std::{sync::Arc, time::Duration};

use shared::{
    domain::{ChatMessage, STATUS_ERROR, STATUS_IDLE, STATUS_LISTENING, STATUS_THINKING},
    protocol::UpdatesResponse,
};
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::{config::Settings, responder::Responder};

pub const APOLOGY_REPLY: &str = "I'm sorry, I encountered an error while processing your request.";

#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub greeting: String,
    pub max_history: Option<usize>,
    pub reply_delay: Duration,
    pub voice_capture: Duration,
    pub voice_transcript: Option<String>,
}

impl From<&Settings> for BackendConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            greeting: settings.greeting.clone(),
            max_history: settings.max_history,
            reply_delay: settings.reply_delay(),
            voice_capture: settings.voice_capture(),
            voice_transcript: settings.voice_transcript.clone(),
        }
    }
}

#[derive(Debug)]
struct ChatState {
    status: String,
    chat_history: Vec<ChatMessage>,
}

#[derive(Clone)]
pub struct ChatBackend {
    state: Arc<Mutex<ChatState>>,
    responder: Arc<dyn Responder>,
    config: Arc<BackendConfig>,
}

impl ChatBackend {
    pub fn new(config: BackendConfig, responder: Arc<dyn Responder>) -> Self {
        let state = ChatState {
            status: STATUS_IDLE.to_string(),
            chat_history: vec![ChatMessage::assistant(config.greeting.clone())],
        };
        Self {
            state: Arc::new(Mutex::new(state)),
            responder,
            config: Arc::new(config),
        }
    }

    pub async fn snapshot(&self) -> UpdatesResponse {
        let state = self.state.lock().await;
        UpdatesResponse {
            status: state.status.clone(),
            chat_history: state.chat_history.clone(),
        }
    }

    /// Records the query and answers it in the background. Blank queries are
    /// ignored. Returns whether a reply was scheduled.
    pub async fn accept_query(&self, query: &str) -> bool {
        let query = query.trim();
        if query.is_empty() {
            debug!("ignoring blank query");
            return false;
        }

        self.begin_query(query).await;
        let backend = self.clone();
        let query = query.to_string();
        tokio::spawn(async move { backend.answer(&query).await });
        true
    }

    /// Switches to the listening status, then finishes capture in the
    /// background.
    pub async fn start_voice_capture(&self) {
        self.set_status(STATUS_LISTENING).await;
        let backend = self.clone();
        tokio::spawn(async move { backend.finish_voice_capture().await });
    }

    async fn finish_voice_capture(&self) {
        tokio::time::sleep(self.config.voice_capture).await;

        match self.config.voice_transcript.clone() {
            Some(transcript) => {
                info!(%transcript, "voice capture produced a transcript");
                self.begin_query(&transcript).await;
                self.answer(&transcript).await;
            }
            None => {
                info!("voice capture heard nothing");
                self.set_status(STATUS_IDLE).await;
            }
        }
    }

    async fn begin_query(&self, query: &str) {
        let mut state = self.state.lock().await;
        state.status = STATUS_THINKING.to_string();
        state.chat_history.push(ChatMessage::user(query));
    }

    async fn answer(&self, query: &str) {
        tokio::time::sleep(self.config.reply_delay).await;

        let history = self.state.lock().await.chat_history.clone();
        let reply = self.responder.respond(query, &history).await;

        match reply {
            Ok(content) => self.record_reply(ChatMessage::assistant(content)).await,
            Err(err) => {
                error!(error = %err, "responder failed");
                self.record_failure().await;
            }
        }
        self.set_status(STATUS_IDLE).await;
    }

    async fn record_reply(&self, reply: ChatMessage) {
        let mut state = self.state.lock().await;
        state.chat_history.push(reply);
        if let Some(max_history) = self.config.max_history {
            trim_history(&mut state.chat_history, max_history);
        }
    }

    /// Reports the failure through status and transcript. The caller
    /// returns to idle under a separate lock.
    async fn record_failure(&self) {
        self.state.lock().await.status = STATUS_ERROR.to_string();
        self.record_reply(ChatMessage::assistant(APOLOGY_REPLY)).await;
    }

    async fn set_status(&self, status: &str) {
        self.state.lock().await.status = status.to_string();
    }
}

fn trim_history(history: &mut Vec<ChatMessage>, max_history: usize) {
    if history.len() > max_history {
        let excess = history.len() - max_history;
        history.drain(..excess);
    }
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
