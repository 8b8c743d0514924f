mod ui;

use anyhow::Context;
use clap::Parser;
use client_core::{
    bridge::{COMMAND_QUEUE_CAPACITY, EVENT_QUEUE_CAPACITY},
    load_client_settings,
    reconcile::CONNECTING_STATUS_LINE,
    spawn_backend_worker, BackendClient, ChatController, RedrawPolicy, ViewModel,
};
use crossbeam_channel::bounded;
use eframe::egui;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::ui::ChatApp;

const APP_TITLE: &str = "S.A.R.A. Assistant";

#[derive(Parser, Debug)]
#[command(about = "Desktop chat window for the assistant backend")]
struct Args {
    /// Backend base URL. Overrides client.toml and the environment.
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    poll_interval_ms: Option<u64>,
    /// `length` (default) or `content`.
    #[arg(long)]
    redraw_policy: Option<RedrawPolicy>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
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
    info!(server_url = client.server_url(), "starting desktop assistant");

    let (cmd_tx, cmd_rx) = bounded(COMMAND_QUEUE_CAPACITY);
    let (ui_tx, ui_rx) = bounded(EVENT_QUEUE_CAPACITY);
    spawn_backend_worker(client, settings.poll_interval(), cmd_rx, ui_tx);

    let controller = ChatController::new(
        cmd_tx,
        settings.render_options(),
        settings.discard_stale_polls,
    );
    let app = ChatApp::new(controller, ViewModel::new(CONNECTING_STATUS_LINE), ui_rx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(APP_TITLE)
            .with_inner_size([520.0, 720.0])
            .with_min_inner_size([360.0, 420.0]),
        ..Default::default()
    };
    eframe::run_native(APP_TITLE, options, Box::new(|_cc| Ok(Box::new(app))))
        .map_err(|err| anyhow::anyhow!("desktop window failed: {err}"))
}
