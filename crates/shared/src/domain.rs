use serde::{Deserialize, Serialize};

pub const STATUS_IDLE: &str = "Idle";
pub const STATUS_THINKING: &str = "Thinking...";
pub const STATUS_LISTENING: &str = "Listening...";
pub const STATUS_ERROR: &str = "Error";

/// Who a chat message came from. Anything the backend reports other than
/// `"user"` is treated as the assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

impl From<String> for ChatRole {
    fn from(value: String) -> Self {
        if value == "user" {
            ChatRole::User
        } else {
            ChatRole::Assistant
        }
    }
}

impl From<ChatRole> for String {
    fn from(value: ChatRole) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_roles_decode_as_assistant() {
        let message: ChatMessage =
            serde_json::from_str(r#"{"role":"system","content":"boot"}"#).expect("json");
        assert_eq!(message.role, ChatRole::Assistant);

        let message: ChatMessage =
            serde_json::from_str(r#"{"role":"user","content":"hi"}"#).expect("json");
        assert_eq!(message, ChatMessage::user("hi"));
    }

    #[test]
    fn roles_serialize_as_lowercase_strings() {
        let json = serde_json::to_value(ChatMessage::assistant("hello")).expect("json");
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"], "hello");
    }
}
