use std::time::Duration;

use reqwest::Client;
use shared::protocol::{QueryRequest, UpdatesResponse, QUERY_PATH, START_VOICE_PATH, UPDATES_PATH};
use tracing::debug;
use url::Url;

use crate::error::{ClientError, ClientResult};

/// HTTP client for the three backend endpoints. Cheap to clone; clones share
/// the connection pool.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: Client,
    server_url: String,
}

impl BackendClient {
    pub fn new(server_url: &str) -> ClientResult<Self> {
        Self::with_timeout(server_url, None)
    }

    /// `timeout` of `None` leaves requests bounded only by the transport defaults.
    pub fn with_timeout(server_url: &str, timeout: Option<Duration>) -> ClientResult<Self> {
        let server_url = normalize_server_url(server_url)?;
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ClientError::Build)?;
        Ok(Self { http, server_url })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}{}", self.server_url, path)
    }

    /// Sends a text query. The response body is ignored.
    pub async fn post_query(&self, query: &str) -> ClientResult<()> {
        let res = self
            .http
            .post(self.endpoint_url(QUERY_PATH))
            .json(&QueryRequest {
                query: query.to_string(),
            })
            .send()
            .await
            .map_err(|source| ClientError::Network {
                endpoint: QUERY_PATH,
                source,
            })?;
        ensure_success(QUERY_PATH, res.status())?;
        debug!(endpoint = QUERY_PATH, "query accepted");
        Ok(())
    }

    /// Asks the backend to start listening for voice input. The response body is ignored.
    pub async fn start_voice(&self) -> ClientResult<()> {
        let res = self
            .http
            .post(self.endpoint_url(START_VOICE_PATH))
            .send()
            .await
            .map_err(|source| ClientError::Network {
                endpoint: START_VOICE_PATH,
                source,
            })?;
        ensure_success(START_VOICE_PATH, res.status())?;
        debug!(endpoint = START_VOICE_PATH, "voice capture requested");
        Ok(())
    }

    pub async fn fetch_updates(&self) -> ClientResult<UpdatesResponse> {
        let res = self
            .http
            .get(self.endpoint_url(UPDATES_PATH))
            .send()
            .await
            .map_err(|source| ClientError::Network {
                endpoint: UPDATES_PATH,
                source,
            })?;
        ensure_success(UPDATES_PATH, res.status())?;
        res.json::<UpdatesResponse>()
            .await
            .map_err(|source| ClientError::Decode {
                endpoint: UPDATES_PATH,
                source,
            })
    }
}

fn ensure_success(endpoint: &'static str, status: reqwest::StatusCode) -> ClientResult<()> {
    if status.is_success() {
        Ok(())
    } else {
        Err(ClientError::HttpStatus { endpoint, status })
    }
}

fn normalize_server_url(raw: &str) -> ClientResult<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed).map_err(|source| ClientError::InvalidBaseUrl {
        url: raw.to_string(),
        source,
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ClientError::UnsupportedScheme {
            url: raw.to_string(),
        });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
