//! The view surface the reconciler drives: a scrollable message container, a
//! single-line text input, a mic button and a status line.

use shared::domain::ChatRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageStyle {
    User,
    Assistant,
}

impl MessageStyle {
    pub fn for_role(role: ChatRole) -> Self {
        match role {
            ChatRole::User => MessageStyle::User,
            ChatRole::Assistant => MessageStyle::Assistant,
        }
    }

    /// Style class name as used by the original web front-end.
    pub fn class_name(self) -> &'static str {
        match self {
            MessageStyle::User => "user-message",
            MessageStyle::Assistant => "sara-message",
        }
    }
}

pub trait View {
    fn set_status_text(&mut self, text: &str);
    fn set_mic_enabled(&mut self, enabled: bool);
    fn input_text(&self) -> &str;
    fn clear_input(&mut self);
    /// Removes every rendered message node.
    fn clear_messages(&mut self);
    fn append_message(&mut self, style: MessageStyle, label: &str, content: &str);
    /// Scrolls the message container to its maximum offset.
    fn scroll_to_bottom(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub style: MessageStyle,
    pub label: String,
    pub content: String,
}

/// Plain-data view shared by the GUI and terminal front-ends. Front-ends read
/// it back each frame; nothing here touches a real widget toolkit.
#[derive(Debug, Clone)]
pub struct ViewModel {
    pub input: String,
    status_line: String,
    mic_enabled: bool,
    messages: Vec<RenderedMessage>,
    scroll_pending: bool,
    redraws: u64,
}

impl ViewModel {
    pub fn new(initial_status: impl Into<String>) -> Self {
        Self {
            input: String::new(),
            status_line: initial_status.into(),
            mic_enabled: true,
            messages: Vec::new(),
            scroll_pending: false,
            redraws: 0,
        }
    }

    pub fn status_line(&self) -> &str {
        &self.status_line
    }

    pub fn mic_enabled(&self) -> bool {
        self.mic_enabled
    }

    pub fn messages(&self) -> &[RenderedMessage] {
        &self.messages
    }

    /// Number of times the transcript has been cleared for a redraw.
    pub fn redraw_count(&self) -> u64 {
        self.redraws
    }

    /// Returns whether a scroll-to-bottom was requested since the last call.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_pending)
    }
}

impl View for ViewModel {
    fn set_status_text(&mut self, text: &str) {
        if self.status_line != text {
            self.status_line = text.to_string();
        }
    }

    fn set_mic_enabled(&mut self, enabled: bool) {
        self.mic_enabled = enabled;
    }

    fn input_text(&self) -> &str {
        &self.input
    }

    fn clear_input(&mut self) {
        self.input.clear();
    }

    fn clear_messages(&mut self) {
        self.messages.clear();
        self.redraws += 1;
    }

    fn append_message(&mut self, style: MessageStyle, label: &str, content: &str) {
        self.messages.push(RenderedMessage {
            style,
            label: label.to_string(),
            content: content.to_string(),
        });
    }

    fn scroll_to_bottom(&mut self) {
        self.scroll_pending = true;
    }
}
