//! Single-writer controller: the only code that mutates [`UiState`] and the view.

use crossbeam_channel::{Sender, TrySendError};
use shared::protocol::UpdatesResponse;
use tracing::{debug, warn};

use crate::{
    bridge::{BackendCommand, PollTicket, UiEvent},
    error::ClientError,
    reconcile::{reconcile, RenderOptions, UiState, LISTENING_STATUS_LINE},
    view::View,
};

pub const QUEUE_FULL_STATUS_LINE: &str = "Status: UI command queue is full; please retry";
pub const QUEUE_DISCONNECTED_STATUS_LINE: &str =
    "Status: Backend worker disconnected; restart the client";

/// Queues `cmd` for the backend worker. On failure the status line is
/// replaced with a queue diagnostic and `false` is returned.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) -> bool {
    let cmd_name = cmd.name();
    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            debug!(command = cmd_name, "queued ui->backend command");
            true
        }
        Err(TrySendError::Full(_)) => {
            *status = QUEUE_FULL_STATUS_LINE.to_string();
            warn!(command = cmd_name, "ui->backend command queue is full");
            false
        }
        Err(TrySendError::Disconnected(_)) => {
            *status = QUEUE_DISCONNECTED_STATUS_LINE.to_string();
            warn!(command = cmd_name, "ui->backend command queue disconnected");
            false
        }
    }
}

pub struct ChatController {
    cmd_tx: Sender<BackendCommand>,
    state: UiState,
    options: RenderOptions,
    discard_stale_polls: bool,
    last_applied: Option<PollTicket>,
}

impl ChatController {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        options: RenderOptions,
        discard_stale_polls: bool,
    ) -> Self {
        Self {
            cmd_tx,
            state: UiState::default(),
            options,
            discard_stale_polls,
            last_applied: None,
        }
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Sends the trimmed input as a query. Blank input is left untouched and
    /// nothing is sent. The message itself only appears once a later poll
    /// reports it.
    pub fn submit_query<V: View + ?Sized>(&mut self, view: &mut V) -> bool {
        let query = view.input_text().trim().to_string();
        if query.is_empty() {
            return false;
        }
        view.clear_input();
        self.dispatch(BackendCommand::SubmitQuery { text: query }, view)
    }

    /// Shows the listening status and disables the mic until a poll reports
    /// a non-listening status.
    pub fn request_voice_input<V: View + ?Sized>(&mut self, view: &mut V) -> bool {
        self.state.status_text = LISTENING_STATUS_LINE.to_string();
        view.set_status_text(&self.state.status_text);
        self.state.mic_disabled = true;
        view.set_mic_enabled(false);
        self.dispatch(BackendCommand::StartVoice, view)
    }

    pub fn handle_event<V: View + ?Sized>(&mut self, event: UiEvent, view: &mut V) {
        match event {
            UiEvent::Info(message) => debug!(%message, "backend worker info"),
            UiEvent::WorkerFailed(message) => {
                warn!(%message, "backend worker failed");
                self.state.status_text = format!("Status: {message}");
                view.set_status_text(&self.state.status_text);
            }
            UiEvent::PollCompleted { ticket, result } => {
                self.apply_poll(ticket, result.as_ref(), view);
            }
        }
    }

    /// Reconciles one poll result. Returns whether the transcript was redrawn.
    pub fn apply_poll<V: View + ?Sized>(
        &mut self,
        ticket: PollTicket,
        result: Result<&UpdatesResponse, &ClientError>,
        view: &mut V,
    ) -> bool {
        if self.discard_stale_polls && self.last_applied.is_some_and(|last| ticket < last) {
            debug!(
                ticket = ticket.0,
                last_applied = ?self.last_applied,
                "ignoring stale poll result"
            );
            return false;
        }
        self.last_applied = Some(self.last_applied.map_or(ticket, |last| last.max(ticket)));

        let state = std::mem::take(&mut self.state);
        let reconciled = reconcile(state, result, &self.options, view);
        self.state = reconciled.state;
        reconciled.redrawn
    }

    fn dispatch<V: View + ?Sized>(&mut self, cmd: BackendCommand, view: &mut V) -> bool {
        let queued = dispatch_backend_command(&self.cmd_tx, cmd, &mut self.state.status_text);
        if !queued {
            view.set_status_text(&self.state.status_text);
        }
        queued
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
