use serde::{Deserialize, Serialize};

use crate::domain::ChatMessage;

pub const QUERY_PATH: &str = "/query";
pub const START_VOICE_PATH: &str = "/start_voice";
pub const UPDATES_PATH: &str = "/updates";
pub const HEALTHZ_PATH: &str = "/healthz";

pub const ACK_RECEIVED: &str = "received";
pub const ACK_LISTENING: &str = "listening";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub query: String,
}

/// Acknowledgement body of `/query` and `/start_voice`. Clients never inspect it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AckResponse {
    pub status: String,
}

impl AckResponse {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
        }
    }
}

/// Aggregated backend state returned by `/updates`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatesResponse {
    pub status: String,
    pub chat_history: Vec<ChatMessage>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ChatRole;

    #[test]
    fn updates_response_requires_chat_history() {
        let err = serde_json::from_str::<UpdatesResponse>(r#"{"status":"Idle"}"#);
        assert!(err.is_err());

        let parsed: UpdatesResponse = serde_json::from_str(
            r#"{"status":"Idle","chat_history":[{"role":"assistant","content":"Hello!"}]}"#,
        )
        .expect("json");
        assert_eq!(parsed.status, "Idle");
        assert_eq!(parsed.chat_history.len(), 1);
        assert_eq!(parsed.chat_history[0].role, ChatRole::Assistant);
    }

    #[test]
    fn query_request_tolerates_missing_field() {
        let parsed: QueryRequest = serde_json::from_str("{}").expect("json");
        assert!(parsed.query.is_empty());
    }
}
