mod terminal;

use std::{
    io::{self, BufRead},
    thread,
};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    bridge::{COMMAND_QUEUE_CAPACITY, EVENT_QUEUE_CAPACITY},
    load_client_settings,
    reconcile::CONNECTING_STATUS_LINE,
    spawn_backend_worker, BackendClient, ChatController, ClientSettings, RedrawPolicy, UiState,
};
use crossbeam_channel::{bounded, select};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::terminal::TerminalView;

const QUIT_COMMAND: &str = "/quit";
const VOICE_COMMAND: &str = "/voice";

#[derive(Parser, Debug)]
#[command(about = "Terminal client for the assistant backend")]
struct Args {
    /// Backend base URL. Overrides client.toml and the environment.
    #[arg(long, global = true)]
    server_url: Option<String>,
    #[arg(long, global = true)]
    poll_interval_ms: Option<u64>,
    /// `length` (default) or `content`.
    #[arg(long, global = true)]
    redraw_policy: Option<RedrawPolicy>,
    /// Prefix printed lines with a local timestamp.
    #[arg(long, global = true)]
    timestamps: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive session: lines are sent as queries, `/voice` starts voice
    /// capture and `/quit` exits.
    Chat,
    /// Fetch the backend state once and print it.
    Poll {
        /// Print the raw snapshot as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Send one text query.
    Query { text: Vec<String> },
    /// Ask the backend to start listening for voice input.
    Voice,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_client_settings();
    if let Some(url) = args.server_url {
        settings.server_url = url;
    }
    if let Some(ms) = args.poll_interval_ms.filter(|ms| *ms > 0) {
        settings.poll_interval_ms = ms;
    }
    if let Some(policy) = args.redraw_policy {
        settings.redraw_policy = policy;
    }

    let client = BackendClient::with_timeout(&settings.server_url, settings.request_timeout())
        .context("invalid backend configuration")?;
    info!(server_url = client.server_url(), command = ?args.command, "starting terminal client");

    match args.command {
        Command::Chat => run_chat(client, &settings, args.timestamps),
        Command::Poll { json } => run_poll(&client, &settings, json, args.timestamps),
        Command::Query { text } => {
            let query = text.join(" ");
            if query.trim().is_empty() {
                bail!("query text is empty");
            }
            block_on(client.post_query(query.trim()))??;
            println!("Query sent.");
            Ok(())
        }
        Command::Voice => {
            block_on(client.start_voice())??;
            println!("Voice capture requested.");
            Ok(())
        }
    }
}

fn block_on<F: std::future::Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build runtime")?;
    Ok(runtime.block_on(future))
}

fn run_poll(
    client: &BackendClient,
    settings: &ClientSettings,
    json: bool,
    timestamps: bool,
) -> Result<()> {
    let updates = block_on(client.fetch_updates())??;
    if json {
        println!("{}", serde_json::to_string_pretty(&updates)?);
        return Ok(());
    }

    let mut view = TerminalView::new(io::stdout().lock(), CONNECTING_STATUS_LINE, timestamps);
    client_core::reconcile(
        UiState::default(),
        Ok(&updates),
        &settings.render_options(),
        &mut view,
    );
    Ok(())
}

fn run_chat(client: BackendClient, settings: &ClientSettings, timestamps: bool) -> Result<()> {
    let (cmd_tx, cmd_rx) = bounded(COMMAND_QUEUE_CAPACITY);
    let (ui_tx, ui_rx) = bounded(EVENT_QUEUE_CAPACITY);
    let worker = spawn_backend_worker(client, settings.poll_interval(), cmd_rx, ui_tx);

    let (line_tx, line_rx) = bounded::<String>(64);
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });

    let mut controller = ChatController::new(
        cmd_tx,
        settings.render_options(),
        settings.discard_stale_polls,
    );
    let mut view = TerminalView::new(io::stdout(), CONNECTING_STATUS_LINE, timestamps);
    eprintln!("Type a message and press Enter. {VOICE_COMMAND} speaks, {QUIT_COMMAND} exits.");

    loop {
        select! {
            recv(ui_rx) -> event => match event {
                Ok(event) => controller.handle_event(event, &mut view),
                Err(_) => bail!("backend worker stopped"),
            },
            recv(line_rx) -> line => match line.as_deref().map(str::trim) {
                Ok(QUIT_COMMAND) | Err(_) => break,
                Ok(VOICE_COMMAND) => {
                    if view.mic_enabled() {
                        controller.request_voice_input(&mut view);
                    } else {
                        eprintln!("Still listening; wait for the current capture to finish.");
                    }
                }
                Ok(text) => {
                    view.set_input(text);
                    controller.submit_query(&mut view);
                }
            },
        }
    }

    debug!("closing chat session");
    drop(controller);
    worker
        .join()
        .map_err(|_| anyhow::anyhow!("backend worker panicked"))?;
    Ok(())
}
