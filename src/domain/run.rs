use std::fmt;
use std::num::{NonZeroU64, NonZeroUsize};
use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Content type applied to file bodies unless overridden.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Clone, Copy, ValueEnum, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
}

impl HttpMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
        }
    }
}

/// When a run stops issuing new requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Exactly `n` attempts across all workers.
    FixedCount(NonZeroU64),
    /// No request starts once this much time has elapsed.
    Duration(Duration),
}

impl Termination {
    /// Builds a fixed-count policy.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::RequestsZero` when `requests` is 0.
    pub fn fixed_count(requests: u64) -> Result<Self, ConfigError> {
        NonZeroU64::new(requests)
            .map(Termination::FixedCount)
            .ok_or(ConfigError::RequestsZero)
    }

    /// Builds a wall-clock policy.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::DurationZero` when `duration` is zero.
    pub fn for_duration(duration: Duration) -> Result<Self, ConfigError> {
        if duration.is_zero() {
            return Err(ConfigError::DurationZero);
        }
        Ok(Termination::Duration(duration))
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::FixedCount(count) => write!(f, "{} requests", count),
            Termination::Duration(duration) => write!(f, "{}ms", duration.as_millis()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHeader {
    pub name: String,
    pub value: String,
}

impl RequestHeader {
    /// Parses a `Key: Value` pair.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidHeader` when there is no `:` or the key is empty.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let (name, value) = raw
            .split_once(':')
            .ok_or_else(|| ConfigError::InvalidHeader {
                value: raw.to_owned(),
            })?;
        let name = name.trim();
        let value = value.trim();
        if name.is_empty()
            || http::header::HeaderName::from_bytes(name.as_bytes()).is_err()
            || http::header::HeaderValue::from_str(value).is_err()
        {
            return Err(ConfigError::InvalidHeader {
                value: raw.to_owned(),
            });
        }
        Ok(Self {
            name: name.to_owned(),
            value: value.to_owned(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestBody {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Parsed TLS material shared read-only by every worker client.
#[derive(Clone, Default)]
pub struct TlsMaterials {
    pub root_ca: Option<reqwest::Certificate>,
    pub identity: Option<reqwest::Identity>,
}

impl fmt::Debug for TlsMaterials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TlsMaterials")
            .field("root_ca", &self.root_ca.is_some())
            .field("identity", &self.identity.is_some())
            .finish()
    }
}

/// Immutable description of one load test.
#[derive(Debug, Clone)]
pub struct RunConfiguration {
    pub base_url: String,
    pub concurrency: NonZeroUsize,
    pub termination: Termination,
    pub method: HttpMethod,
    pub body: Option<RequestBody>,
    pub header: Option<RequestHeader>,
    pub timeout: Duration,
    pub keep_alive: bool,
    pub tls: TlsMaterials,
    pub url_suffixes: Vec<String>,
    /// Exact samples kept per phase before percentiles switch to a histogram.
    pub metrics_max: usize,
}

impl RunConfiguration {
    /// Smallest valid configuration: one worker, one GET request.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            concurrency: NonZeroUsize::MIN,
            termination: Termination::FixedCount(NonZeroU64::MIN),
            method: HttpMethod::Get,
            body: None,
            header: None,
            timeout: Duration::from_secs(5),
            keep_alive: true,
            tls: TlsMaterials::default(),
            url_suffixes: Vec::new(),
            metrics_max: 1_000_000,
        }
    }
}
