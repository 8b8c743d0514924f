pub use reqwest::StatusCode;
use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid server url '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("unsupported scheme in server url '{url}'; expected http or https")]
    UnsupportedScheme { url: String },
    #[error("failed to build http client: {0}")]
    Build(#[source] reqwest::Error),
    #[error("request to {endpoint} failed: {source}")]
    Network {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} returned HTTP {status}")]
    HttpStatus {
        endpoint: &'static str,
        status: StatusCode,
    },
    #[error("failed to decode {endpoint} response: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

impl ClientError {
    /// Errors a request can produce once the client exists. The poll boundary
    /// folds all of them into the single connection-error category.
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            ClientError::Network { .. } | ClientError::HttpStatus { .. } | ClientError::Decode { .. }
        )
    }

    pub fn endpoint(&self) -> Option<&'static str> {
        match self {
            ClientError::Network { endpoint, .. }
            | ClientError::HttpStatus { endpoint, .. }
            | ClientError::Decode { endpoint, .. } => Some(endpoint),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_errors_are_connection_errors() {
        let err = ClientError::HttpStatus {
            endpoint: "/updates",
            status: StatusCode::SERVICE_UNAVAILABLE,
        };
        assert!(err.is_connection_error());
        assert_eq!(err.endpoint(), Some("/updates"));
        assert_eq!(err.to_string(), "/updates returned HTTP 503 Service Unavailable");
    }

    #[test]
    fn configuration_errors_are_not_connection_errors() {
        let err = ClientError::UnsupportedScheme {
            url: "ftp://example.com".to_string(),
        };
        assert!(!err.is_connection_error());
        assert_eq!(err.endpoint(), None);
    }
}
