use super::*;
use crate::view::ViewModel;

fn updates(status: &str, history: Vec<ChatMessage>) -> UpdatesResponse {
    UpdatesResponse {
        status: status.to_string(),
        chat_history: history,
    }
}

fn history_of(contents: &[&str]) -> Vec<ChatMessage> {
    contents
        .iter()
        .enumerate()
        .map(|(idx, content)| {
            if idx % 2 == 0 {
                ChatMessage::user(*content)
            } else {
                ChatMessage::assistant(*content)
            }
        })
        .collect()
}

fn server_error() -> ClientError {
    ClientError::HttpStatus {
        endpoint: "/updates",
        status: reqwest::StatusCode::BAD_GATEWAY,
    }
}

fn contents(view: &ViewModel) -> Vec<&str> {
    view.messages().iter().map(|m| m.content.as_str()).collect()
}

#[test]
fn initial_idle_poll_leaves_transcript_empty() {
    let mut view = ViewModel::new(CONNECTING_STATUS_LINE);
    let options = RenderOptions::default();

    let out = reconcile(
        UiState::default(),
        Ok(&updates("Idle", Vec::new())),
        &options,
        &mut view,
    );

    assert!(!out.redrawn);
    assert!(view.messages().is_empty());
    assert_eq!(view.status_line(), "Status: Idle");
    assert!(view.mic_enabled());
    assert_eq!(out.state.last_message_count, 0);
    assert!(!out.state.mic_disabled);
}

#[test]
fn listening_poll_redraws_and_keeps_mic_disabled() {
    let mut view = ViewModel::new(CONNECTING_STATUS_LINE);
    view.set_mic_enabled(false);
    let state = UiState {
        mic_disabled: true,
        ..UiState::default()
    };

    let out = reconcile(
        state,
        Ok(&updates("Listening...", vec![ChatMessage::user("hi")])),
        &RenderOptions::default(),
        &mut view,
    );

    assert!(out.redrawn);
    assert_eq!(view.messages().len(), 1);
    assert_eq!(view.messages()[0].style, MessageStyle::User);
    assert_eq!(view.messages()[0].label, "You");
    assert_eq!(view.messages()[0].content, "hi");
    assert!(!view.mic_enabled());
    assert!(out.state.mic_disabled);
    assert_eq!(view.status_line(), "Status: Listening...");
    assert_eq!(out.state.last_message_count, 1);
    assert!(view.take_scroll_request());
}

#[test]
fn length_change_triggers_full_redraw() {
    let mut view = ViewModel::new(CONNECTING_STATUS_LINE);
    let options = RenderOptions::default();

    let first = reconcile(
        UiState::default(),
        Ok(&updates("Idle", history_of(&["a", "b"]))),
        &options,
        &mut view,
    );
    assert!(first.redrawn);
    assert_eq!(view.redraw_count(), 1);

    let second = reconcile(
        first.state,
        Ok(&updates("Idle", history_of(&["a", "b", "c"]))),
        &options,
        &mut view,
    );
    assert!(second.redrawn);
    assert_eq!(view.redraw_count(), 2);
    assert_eq!(contents(&view), vec!["a", "b", "c"]);
    assert_eq!(second.state.last_message_count, 3);

    let shrunk = reconcile(
        second.state,
        Ok(&updates("Idle", history_of(&["z"]))),
        &options,
        &mut view,
    );
    assert!(shrunk.redrawn);
    assert_eq!(contents(&view), vec!["z"]);
    assert_eq!(shrunk.state.last_message_count, 1);
}

#[test]
fn equal_length_history_is_not_redrawn_under_length_policy() {
    let mut view = ViewModel::new(CONNECTING_STATUS_LINE);
    let options = RenderOptions::default();

    let first = reconcile(
        UiState::default(),
        Ok(&updates("Idle", history_of(&["one", "two", "three"]))),
        &options,
        &mut view,
    );
    assert!(first.redrawn);

    let second = reconcile(
        first.state,
        Ok(&updates("Idle", history_of(&["uno", "dos", "tres"]))),
        &options,
        &mut view,
    );

    assert!(!second.redrawn);
    assert_eq!(view.redraw_count(), 1);
    assert_eq!(contents(&view), vec!["one", "two", "three"]);
}

#[test]
fn content_policy_redraws_equal_length_replacement() {
    let mut view = ViewModel::new(CONNECTING_STATUS_LINE);
    let options = RenderOptions {
        policy: RedrawPolicy::ContentChange,
        ..RenderOptions::default()
    };

    let first = reconcile(
        UiState::default(),
        Ok(&updates("Idle", history_of(&["one", "two", "three"]))),
        &options,
        &mut view,
    );
    let unchanged = reconcile(
        first.state,
        Ok(&updates("Idle", history_of(&["one", "two", "three"]))),
        &options,
        &mut view,
    );
    assert!(!unchanged.redrawn);

    let replaced = reconcile(
        unchanged.state,
        Ok(&updates("Idle", history_of(&["uno", "dos", "tres"]))),
        &options,
        &mut view,
    );

    assert!(replaced.redrawn);
    assert_eq!(view.redraw_count(), 2);
    assert_eq!(contents(&view), vec!["uno", "dos", "tres"]);
}

#[test]
fn failed_poll_reports_connection_error_and_enables_mic() {
    let mut view = ViewModel::new(CONNECTING_STATUS_LINE);
    view.set_mic_enabled(false);
    let state = UiState {
        last_message_count: 2,
        mic_disabled: true,
        status_text: LISTENING_STATUS_LINE.to_string(),
        ..UiState::default()
    };

    let err = server_error();
    let out = reconcile(state, Err(&err), &RenderOptions::default(), &mut view);

    assert!(!out.redrawn);
    assert_eq!(view.status_line(), CONNECTION_ERROR_STATUS_LINE);
    assert_eq!(out.state.status_text, CONNECTION_ERROR_STATUS_LINE);
    assert!(view.mic_enabled());
    assert!(!out.state.mic_disabled);
    assert_eq!(out.state.last_message_count, 2);
}

#[test]
fn assistant_messages_use_configured_label() {
    let mut view = ViewModel::new(CONNECTING_STATUS_LINE);
    let options = RenderOptions {
        assistant_label: "Jarvis".to_string(),
        ..RenderOptions::default()
    };

    reconcile(
        UiState::default(),
        Ok(&updates("Idle", vec![ChatMessage::assistant("Hello!")])),
        &options,
        &mut view,
    );

    assert_eq!(view.messages()[0].style, MessageStyle::Assistant);
    assert_eq!(view.messages()[0].label, "Jarvis");
}

#[test]
fn parses_redraw_policy_names() {
    assert_eq!("length".parse::<RedrawPolicy>(), Ok(RedrawPolicy::LengthChange));
    assert_eq!(
        " Content ".parse::<RedrawPolicy>(),
        Ok(RedrawPolicy::ContentChange)
    );
    assert!("hash".parse::<RedrawPolicy>().is_err());
}
