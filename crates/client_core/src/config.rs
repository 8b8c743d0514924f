use std::{fs, path::Path, time::Duration};

use serde::Deserialize;
use tracing::warn;

use crate::reconcile::{RedrawPolicy, RenderOptions};

pub const DEFAULT_CONFIG_FILE: &str = "client.toml";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub server_url: String,
    pub poll_interval_ms: u64,
    pub request_timeout_ms: Option<u64>,
    pub redraw_policy: RedrawPolicy,
    pub discard_stale_polls: bool,
    pub user_label: String,
    pub assistant_label: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".into(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            request_timeout_ms: None,
            redraw_policy: RedrawPolicy::LengthChange,
            discard_stale_polls: true,
            user_label: "You".into(),
            assistant_label: "S.A.R.A.".into(),
        }
    }
}

impl ClientSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            policy: self.redraw_policy,
            user_label: self.user_label.clone(),
            assistant_label: self.assistant_label.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    server_url: Option<String>,
    poll_interval_ms: Option<u64>,
    request_timeout_ms: Option<u64>,
    redraw_policy: Option<RedrawPolicy>,
    discard_stale_polls: Option<bool>,
    user_label: Option<String>,
    assistant_label: Option<String>,
}

/// Defaults, then `client.toml` in the working directory, then environment.
pub fn load_client_settings() -> ClientSettings {
    load_client_settings_from(Path::new(DEFAULT_CONFIG_FILE), |name| {
        std::env::var(name).ok()
    })
}

pub fn load_client_settings_from(
    config_path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> ClientSettings {
    let mut settings = ClientSettings::default();

    if let Ok(raw) = fs::read_to_string(config_path) {
        match toml::from_str::<FileConfig>(&raw) {
            Ok(file_cfg) => apply_file_config(&mut settings, file_cfg),
            Err(error) => warn!(
                path = %config_path.display(),
                %error,
                "ignoring unreadable client config file"
            ),
        }
    }

    if let Some(v) = env("CHAT_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = env("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(v) = env("APP__POLL_INTERVAL_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.poll_interval_ms = parsed;
        }
    }
    if let Some(v) = env("APP__REQUEST_TIMEOUT_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_ms = Some(parsed);
        }
    }
    if let Some(v) = env("APP__REDRAW_POLICY") {
        match v.parse::<RedrawPolicy>() {
            Ok(policy) => settings.redraw_policy = policy,
            Err(error) => warn!(%error, "ignoring APP__REDRAW_POLICY"),
        }
    }
    if let Some(v) = env("APP__DISCARD_STALE_POLLS") {
        if let Ok(parsed) = v.parse::<bool>() {
            settings.discard_stale_polls = parsed;
        }
    }
    if let Some(v) = env("APP__USER_LABEL") {
        settings.user_label = v;
    }
    if let Some(v) = env("APP__ASSISTANT_LABEL") {
        settings.assistant_label = v;
    }

    if settings.poll_interval_ms == 0 {
        warn!("poll interval of 0 ms is not allowed; using default");
        settings.poll_interval_ms = DEFAULT_POLL_INTERVAL_MS;
    }
    if settings.request_timeout_ms == Some(0) {
        warn!("request timeout of 0 ms would fail every request; disabling it");
        settings.request_timeout_ms = None;
    }

    settings
}

fn apply_file_config(settings: &mut ClientSettings, file_cfg: FileConfig) {
    if let Some(v) = file_cfg.server_url {
        settings.server_url = v;
    }
    if let Some(v) = file_cfg.poll_interval_ms {
        settings.poll_interval_ms = v;
    }
    if let Some(v) = file_cfg.request_timeout_ms {
        settings.request_timeout_ms = Some(v);
    }
    if let Some(v) = file_cfg.redraw_policy {
        settings.redraw_policy = v;
    }
    if let Some(v) = file_cfg.discard_stale_polls {
        settings.discard_stale_polls = v;
    }
    if let Some(v) = file_cfg.user_label {
        settings.user_label = v;
    }
    if let Some(v) = file_cfg.assistant_label {
        settings.assistant_label = v;
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
