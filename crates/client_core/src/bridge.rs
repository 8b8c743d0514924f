//! Runtime bridge between the UI thread and the backend worker.
//!
//! The UI thread owns all view state. It queues [`BackendCommand`]s for the
//! worker and drains [`UiEvent`]s from it; the worker owns a tokio runtime,
//! performs every HTTP request and runs the poll timer.

use std::{thread, time::Duration};

use crossbeam_channel::{Receiver, Sender, TrySendError};
use shared::protocol::UpdatesResponse;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::{error::ClientError, transport::BackendClient};

pub const COMMAND_QUEUE_CAPACITY: usize = 256;
pub const EVENT_QUEUE_CAPACITY: usize = 2048;

pub enum BackendCommand {
    SubmitQuery { text: String },
    StartVoice,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::SubmitQuery { .. } => "submit_query",
            BackendCommand::StartVoice => "start_voice",
        }
    }
}

/// Issue-order stamp of a poll. Tickets increase with every poll the timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PollTicket(pub u64);

#[derive(Debug)]
pub enum UiEvent {
    Info(String),
    PollCompleted {
        ticket: PollTicket,
        result: Result<UpdatesResponse, ClientError>,
    },
    WorkerFailed(String),
}

/// Starts the backend worker thread. The first poll fires immediately, then
/// every `poll_interval` for as long as the command queue stays connected.
/// Polls are not serialized: a slow response never delays the next tick.
pub fn spawn_backend_worker(
    client: BackendClient,
    poll_interval: Duration,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::WorkerFailed(format!(
                    "backend worker startup failure: failed to build runtime: {err}"
                )));
                error!("failed to build backend runtime: {err}");
                return;
            }
        };

        info!(server_url = client.server_url(), ?poll_interval, "backend worker ready");
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

        let ticker = runtime.spawn(run_poll_ticker(
            client.clone(),
            poll_interval,
            ui_tx.clone(),
        ));

        while let Ok(cmd) = cmd_rx.recv() {
            let client = client.clone();
            runtime.spawn(handle_command(client, cmd));
        }

        debug!("command queue closed; stopping backend worker");
        ticker.abort();
    })
}

async fn handle_command(client: BackendClient, cmd: BackendCommand) {
    let name = cmd.name();
    let result = match cmd {
        BackendCommand::SubmitQuery { text } => client.post_query(&text).await,
        BackendCommand::StartVoice => client.start_voice().await,
    };
    if let Err(error) = result {
        warn!(command = name, %error, "backend request failed");
    }
}

async fn run_poll_ticker(client: BackendClient, poll_interval: Duration, ui_tx: Sender<UiEvent>) {
    let mut interval = tokio::time::interval(poll_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut next_ticket = 0u64;

    loop {
        interval.tick().await;
        let ticket = PollTicket(next_ticket);
        next_ticket += 1;

        let client = client.clone();
        let ui_tx = ui_tx.clone();
        tokio::spawn(async move {
            let result = client.fetch_updates().await;
            match ui_tx.try_send(UiEvent::PollCompleted { ticket, result }) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    warn!(ticket = ticket.0, "ui event queue is full; dropping poll result");
                }
                Err(TrySendError::Disconnected(_)) => {
                    debug!(ticket = ticket.0, "ui event queue closed; dropping poll result");
                }
            }
        });
    }
}

#[cfg(test)]
#[path = "tests/bridge_tests.rs"]
mod tests;
