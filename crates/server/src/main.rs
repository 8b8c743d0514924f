use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use shared::{
    error::{ApiError, ErrorCode},
    protocol::{
        AckResponse, QueryRequest, UpdatesResponse, ACK_LISTENING, ACK_RECEIVED, HEALTHZ_PATH,
        QUERY_PATH, START_VOICE_PATH, UPDATES_PATH,
    },
};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod responder;

use api::{BackendConfig, ChatBackend};
use config::load_settings;
use responder::EchoResponder;

const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;

#[derive(Clone)]
struct AppState {
    backend: ChatBackend,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = load_settings();
    let backend = ChatBackend::new(BackendConfig::from(&settings), Arc::new(EchoResponder));
    let app = build_router(Arc::new(AppState { backend }));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, max_history = ?settings.max_history, "assistant backend listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(HEALTHZ_PATH, get(healthz))
        .route(QUERY_PATH, post(handle_query))
        .route(START_VOICE_PATH, post(start_voice))
        .route(UPDATES_PATH, get(get_updates))
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BODY_BYTES))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn handle_query(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<AckResponse>, (StatusCode, Json<ApiError>)> {
    let Json(req) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "rejected query body");
        let code = if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ErrorCode::PayloadTooLarge
        } else {
            ErrorCode::Validation
        };
        (
            rejection.status(),
            Json(ApiError::new(code, rejection.body_text())),
        )
    })?;

    state.backend.accept_query(&req.query).await;
    Ok(Json(AckResponse::new(ACK_RECEIVED)))
}

async fn start_voice(State(state): State<Arc<AppState>>) -> Json<AckResponse> {
    state.backend.start_voice_capture().await;
    Json(AckResponse::new(ACK_LISTENING))
}

async fn get_updates(State(state): State<Arc<AppState>>) -> Json<UpdatesResponse> {
    Json(state.backend.snapshot().await)
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
