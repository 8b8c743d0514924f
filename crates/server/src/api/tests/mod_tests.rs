use super::*;
use crate::responder::EchoResponder;
use async_trait::async_trait;
use shared::domain::ChatRole;

struct FailingResponder;

#[async_trait]
impl Responder for FailingResponder {
    async fn respond(&self, _query: &str, _history: &[ChatMessage]) -> anyhow::Result<String> {
        anyhow::bail!("model unavailable")
    }
}

fn config() -> BackendConfig {
    BackendConfig {
        greeting: "Hello! How can I assist you today?".into(),
        max_history: None,
        reply_delay: Duration::ZERO,
        voice_capture: Duration::from_millis(20),
        voice_transcript: None,
    }
}

async fn wait_for_idle_with(backend: &ChatBackend, len: usize) -> UpdatesResponse {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    loop {
        let snapshot = backend.snapshot().await;
        if snapshot.status == STATUS_IDLE && snapshot.chat_history.len() == len {
            return snapshot;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "backend never settled: {snapshot:?}"
        );
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

#[tokio::test]
async fn new_backend_is_idle_with_greeting() {
    let backend = ChatBackend::new(config(), Arc::new(EchoResponder));
    let snapshot = backend.snapshot().await;

    assert_eq!(snapshot.status, STATUS_IDLE);
    assert_eq!(
        snapshot.chat_history,
        vec![ChatMessage::assistant("Hello! How can I assist you today?")]
    );
}

#[tokio::test]
async fn accepted_query_is_recorded_before_the_reply() {
    let backend = ChatBackend::new(
        BackendConfig {
            reply_delay: Duration::from_millis(200),
            ..config()
        },
        Arc::new(EchoResponder),
    );

    assert!(backend.accept_query("  what's up  ").await);

    let snapshot = backend.snapshot().await;
    assert_eq!(snapshot.status, STATUS_THINKING);
    assert_eq!(snapshot.chat_history[1], ChatMessage::user("what's up"));

    let settled = wait_for_idle_with(&backend, 3).await;
    assert_eq!(settled.chat_history[2], ChatMessage::assistant("You said: what's up"));
}

#[tokio::test]
async fn blank_query_is_ignored() {
    let backend = ChatBackend::new(config(), Arc::new(EchoResponder));

    assert!(!backend.accept_query("   ").await);

    let snapshot = backend.snapshot().await;
    assert_eq!(snapshot.status, STATUS_IDLE);
    assert_eq!(snapshot.chat_history.len(), 1);
}

#[tokio::test]
async fn responder_failure_appends_apology_and_returns_to_idle() {
    let backend = ChatBackend::new(config(), Arc::new(FailingResponder));

    backend.accept_query("hi").await;

    let settled = wait_for_idle_with(&backend, 3).await;
    let apology = &settled.chat_history[2];
    assert_eq!(apology.role, ChatRole::Assistant);
    assert_eq!(apology.content, APOLOGY_REPLY);
}

#[tokio::test]
async fn configured_cap_trims_to_the_most_recent_messages() {
    let backend = ChatBackend::new(
        BackendConfig {
            max_history: Some(2),
            ..config()
        },
        Arc::new(EchoResponder),
    );

    backend.accept_query("first").await;
    wait_for_idle_with(&backend, 2).await;
    backend.accept_query("second").await;
    let settled = wait_for_idle_with(&backend, 2).await;

    assert_eq!(
        settled.chat_history,
        vec![
            ChatMessage::user("second"),
            ChatMessage::assistant("You said: second"),
        ]
    );
}

#[tokio::test]
async fn voice_capture_without_transcript_returns_to_idle() {
    let backend = ChatBackend::new(config(), Arc::new(EchoResponder));

    backend.start_voice_capture().await;
    assert_eq!(backend.snapshot().await.status, STATUS_LISTENING);

    let settled = wait_for_idle_with(&backend, 1).await;
    assert_eq!(settled.chat_history.len(), 1);
}

#[tokio::test]
async fn voice_capture_with_transcript_is_answered_like_a_query() {
    let backend = ChatBackend::new(
        BackendConfig {
            voice_transcript: Some("turn on the lights".into()),
            ..config()
        },
        Arc::new(EchoResponder),
    );

    backend.start_voice_capture().await;

    let settled = wait_for_idle_with(&backend, 3).await;
    assert_eq!(settled.chat_history[1], ChatMessage::user("turn on the lights"));
    assert_eq!(
        settled.chat_history[2],
        ChatMessage::assistant("You said: turn on the lights")
    );
}

#[test]
fn trim_history_keeps_short_histories_untouched() {
    let mut history = vec![ChatMessage::user("a")];
    trim_history(&mut history, 40);
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn settled_history_keeps_growing_with_default_settings() {
    let backend = ChatBackend::new(
        BackendConfig::from(&Settings {
            reply_delay_ms: 0,
            ..Settings::default()
        }),
        Arc::new(EchoResponder),
    );

    let mut settled_len = backend.snapshot().await.chat_history.len();
    for turn in 0..25 {
        backend.accept_query(&format!("turn {turn}")).await;
        let settled = wait_for_idle_with(&backend, settled_len + 2).await;
        assert!(settled.chat_history.len() > settled_len);
        settled_len = settled.chat_history.len();
    }
    assert_eq!(settled_len, 51);
}

#[tokio::test]
async fn failure_status_is_visible_before_returning_to_idle() {
    let backend = ChatBackend::new(config(), Arc::new(FailingResponder));

    backend.record_failure().await;

    let snapshot = backend.snapshot().await;
    assert_eq!(snapshot.status, STATUS_ERROR);
    assert_eq!(
        snapshot.chat_history.last(),
        Some(&ChatMessage::assistant(APOLOGY_REPLY))
    );
}
