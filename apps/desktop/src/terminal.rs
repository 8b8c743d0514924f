//! Line-oriented [`View`] for terminals. Every redraw reprints the transcript
//! below a separator; status changes are printed as they happen.

use std::io::Write;

use chrono::Local;
use client_core::{MessageStyle, View};
use tracing::warn;

pub const TRANSCRIPT_SEPARATOR: &str = "----------------------------------------";

pub struct TerminalView<W: Write> {
    out: W,
    input: String,
    status_line: String,
    mic_enabled: bool,
    timestamps: bool,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W, initial_status: &str, timestamps: bool) -> Self {
        let mut view = Self {
            out,
            input: String::new(),
            status_line: String::new(),
            mic_enabled: true,
            timestamps,
        };
        view.set_status_text(initial_status);
        view
    }

    pub fn set_input(&mut self, line: &str) {
        self.input = line.to_string();
    }

    pub fn mic_enabled(&self) -> bool {
        self.mic_enabled
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, line: &str) {
        let written = if self.timestamps {
            writeln!(self.out, "[{}] {line}", Local::now().format("%H:%M:%S"))
        } else {
            writeln!(self.out, "{line}")
        };
        if let Err(error) = written {
            warn!(%error, "failed to write to terminal");
        }
    }
}

impl<W: Write> View for TerminalView<W> {
    fn set_status_text(&mut self, text: &str) {
        if self.status_line != text {
            self.status_line = text.to_string();
            self.emit(text);
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
        self.emit(TRANSCRIPT_SEPARATOR);
    }

    fn append_message(&mut self, style: MessageStyle, label: &str, content: &str) {
        let marker = match style {
            MessageStyle::User => ">",
            MessageStyle::Assistant => "<",
        };
        self.emit(&format!("{marker} {label}: {content}"));
    }

    fn scroll_to_bottom(&mut self) {
        if let Err(error) = self.out.flush() {
            warn!(%error, "failed to flush terminal");
        }
    }
}

#[cfg(test)]
#[path = "tests/terminal_tests.rs"]
mod tests;
