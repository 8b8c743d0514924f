use std::{collections::HashMap, fs, path::Path, time::Duration};

use tracing::warn;

pub const DEFAULT_CONFIG_FILE: &str = "server.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_bind: String,
    pub greeting: String,
    /// Cap on retained messages. Off by default: a capped history stops
    /// growing, which hides new exchanges from length-based redraws.
    pub max_history: Option<usize>,
    pub reply_delay_ms: u64,
    pub voice_capture_ms: u64,
    pub voice_transcript: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:5000".into(),
            greeting: "Hello! How can I assist you today?".into(),
            max_history: None,
            reply_delay_ms: 500,
            voice_capture_ms: 3000,
            voice_transcript: None,
        }
    }
}

impl Settings {
    pub fn reply_delay(&self) -> Duration {
        Duration::from_millis(self.reply_delay_ms)
    }

    pub fn voice_capture(&self) -> Duration {
        Duration::from_millis(self.voice_capture_ms)
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(DEFAULT_CONFIG_FILE), |name| {
        std::env::var(name).ok()
    })
}

pub fn load_settings_from(config_path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(config_path) {
        match toml::from_str::<HashMap<String, toml::Value>>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.get("bind_addr").and_then(toml::Value::as_str) {
                    settings.server_bind = v.to_string();
                }
                if let Some(v) = file_cfg.get("greeting").and_then(toml::Value::as_str) {
                    settings.greeting = v.to_string();
                }
                if let Some(v) = file_cfg.get("max_history").and_then(as_u64) {
                    settings.max_history = Some(v as usize);
                }
                if let Some(v) = file_cfg.get("reply_delay_ms").and_then(as_u64) {
                    settings.reply_delay_ms = v;
                }
                if let Some(v) = file_cfg.get("voice_capture_ms").and_then(as_u64) {
                    settings.voice_capture_ms = v;
                }
                if let Some(v) = file_cfg.get("voice_transcript").and_then(toml::Value::as_str) {
                    settings.voice_transcript = Some(v.to_string());
                }
            }
            Err(error) => warn!(
                path = %config_path.display(),
                %error,
                "ignoring unreadable server config file"
            ),
        }
    }

    if let Some(v) = env("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = env("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = env("APP__GREETING") {
        settings.greeting = v;
    }
    if let Some(v) = env("APP__MAX_HISTORY") {
        if let Ok(parsed) = v.parse::<usize>() {
            settings.max_history = Some(parsed);
        }
    }
    if let Some(v) = env("APP__REPLY_DELAY_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.reply_delay_ms = parsed;
        }
    }
    if let Some(v) = env("APP__VOICE_CAPTURE_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.voice_capture_ms = parsed;
        }
    }
    if let Some(v) = env("APP__VOICE_TRANSCRIPT") {
        settings.voice_transcript = Some(v);
    }

    if settings.max_history == Some(0) {
        warn!("max_history of 0 would drop every reply; history stays uncapped");
        settings.max_history = None;
    }
    if settings
        .voice_transcript
        .as_deref()
        .is_some_and(|t| t.trim().is_empty())
    {
        settings.voice_transcript = None;
    }

    settings
}

fn as_u64(value: &toml::Value) -> Option<u64> {
    value.as_integer().and_then(|v| u64::try_from(v).ok())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
