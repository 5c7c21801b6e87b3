use thiserror::Error;

/// Why a single exchange was counted as failed.
///
/// Never propagated past the worker; it only labels the failure in logs.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("DNS lookup failed: {source}")]
    Dns {
        #[source]
        source: reqwest::Error,
    },
    #[error("Connection failed: {source}")]
    Connect {
        #[source]
        source: reqwest::Error,
    },
    #[error("Request timed out: {source}")]
    Timeout {
        #[source]
        source: reqwest::Error,
    },
    #[error("Unexpected status code {code}.")]
    Status { code: u16 },
    #[error("Failed to read response body: {source}")]
    Body {
        #[source]
        source: reqwest::Error,
    },
    #[error("Request failed: {source}")]
    Transport {
        #[source]
        source: reqwest::Error,
    },
}

impl RequestError {
    /// Classifies a transport-level `reqwest` error.
    #[must_use]
    pub fn from_transport(source: reqwest::Error, dns_failed: bool) -> Self {
        if source.is_timeout() {
            RequestError::Timeout { source }
        } else if source.is_connect() && dns_failed {
            RequestError::Dns { source }
        } else if source.is_connect() {
            RequestError::Connect { source }
        } else {
            RequestError::Transport { source }
        }
    }
}
