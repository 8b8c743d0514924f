//! Poll reconciliation: compares a freshly fetched backend snapshot with what
//! the view currently shows and updates the view to match.

use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    str::FromStr,
};

use serde::Deserialize;
use shared::{
    domain::{ChatMessage, ChatRole, STATUS_LISTENING},
    protocol::UpdatesResponse,
};
use tracing::{debug, warn};

use crate::{
    error::ClientError,
    view::{MessageStyle, View},
};

pub const STATUS_PREFIX: &str = "Status: ";
pub const LISTENING_STATUS_LINE: &str = "Status: Listening...";
pub const CONNECTION_ERROR_STATUS_LINE: &str = "Status: Connection error";
pub const CONNECTING_STATUS_LINE: &str = "Status: Connecting...";

pub fn status_line(status: &str) -> String {
    format!("{STATUS_PREFIX}{status}")
}

/// How a poll decides whether the transcript needs to be redrawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedrawPolicy {
    /// Redraw only when the history length changes. A same-length history
    /// with different contents is not detected.
    #[default]
    #[serde(alias = "length")]
    LengthChange,
    /// Also redraw when the contents of a same-length history change.
    #[serde(alias = "content")]
    ContentChange,
}

impl FromStr for RedrawPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "length" | "length_change" => Ok(RedrawPolicy::LengthChange),
            "content" | "content_change" => Ok(RedrawPolicy::ContentChange),
            other => Err(format!(
                "unknown redraw policy '{other}'; expected 'length' or 'content'"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub policy: RedrawPolicy,
    pub user_label: String,
    pub assistant_label: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            policy: RedrawPolicy::LengthChange,
            user_label: "You".to_string(),
            assistant_label: "S.A.R.A.".to_string(),
        }
    }
}

impl RenderOptions {
    pub fn label_for(&self, role: ChatRole) -> &str {
        match role {
            ChatRole::User => &self.user_label,
            ChatRole::Assistant => &self.assistant_label,
        }
    }
}

/// UI state owned by the controller. `last_message_count` always equals the
/// number of messages rendered by the most recent redraw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    pub last_message_count: usize,
    pub mic_disabled: bool,
    pub status_text: String,
    rendered_digest: Option<u64>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            last_message_count: 0,
            mic_disabled: false,
            status_text: CONNECTING_STATUS_LINE.to_string(),
            rendered_digest: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    pub state: UiState,
    pub redrawn: bool,
}

/// Applies one poll result to `view` and returns the updated state.
///
/// A failed poll shows the connection-error status and re-enables the mic.
/// A successful poll always overwrites the status line, re-enables the mic
/// unless the backend is listening, and redraws the whole transcript when
/// `options.policy` reports a change.
pub fn reconcile<V: View + ?Sized>(
    mut state: UiState,
    result: Result<&UpdatesResponse, &ClientError>,
    options: &RenderOptions,
    view: &mut V,
) -> Reconciled {
    let updates = match result {
        Ok(updates) => updates,
        Err(error) => {
            warn!(%error, "polling error; showing connection error");
            state.status_text = CONNECTION_ERROR_STATUS_LINE.to_string();
            view.set_status_text(&state.status_text);
            state.mic_disabled = false;
            view.set_mic_enabled(true);
            return Reconciled {
                state,
                redrawn: false,
            };
        }
    };

    state.status_text = status_line(&updates.status);
    view.set_status_text(&state.status_text);

    if updates.status != STATUS_LISTENING {
        state.mic_disabled = false;
        view.set_mic_enabled(true);
    }

    let history = &updates.chat_history;
    let digest = match options.policy {
        RedrawPolicy::LengthChange => None,
        RedrawPolicy::ContentChange => Some(history_digest(history)),
    };
    let content_changed = matches!(
        (digest, state.rendered_digest),
        (Some(new), Some(old)) if new != old
    );
    let redrawn = history.len() != state.last_message_count || content_changed;

    if redrawn {
        redraw(view, history, options);
        debug!(
            previous = state.last_message_count,
            current = history.len(),
            "transcript redrawn"
        );
        state.last_message_count = history.len();
        state.rendered_digest = digest;
    }

    Reconciled { state, redrawn }
}

fn redraw<V: View + ?Sized>(view: &mut V, history: &[ChatMessage], options: &RenderOptions) {
    view.clear_messages();
    for message in history {
        view.append_message(
            MessageStyle::for_role(message.role),
            options.label_for(message.role),
            &message.content,
        );
    }
    view.scroll_to_bottom();
}

fn history_digest(history: &[ChatMessage]) -> u64 {
    let mut hasher = DefaultHasher::new();
    history.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
#[path = "tests/reconcile_tests.rs"]
mod tests;
