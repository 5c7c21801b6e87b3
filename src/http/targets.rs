use std::sync::atomic::{AtomicUsize, Ordering};

use reqwest::Url;

use crate::error::ConfigError;

/// Checks that `raw` is an absolute http(s) URL with a host.
///
/// # Errors
///
/// Returns `ConfigError::InvalidUrl` otherwise.
pub fn validate_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = || ConfigError::InvalidUrl {
        url: raw.to_owned(),
    };
    let parsed = Url::parse(raw).map_err(|_err| invalid())?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid());
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(invalid());
    }
    Ok(parsed)
}

/// Hands out request URLs, cycling through the configured suffixes.
///
/// Safe to share between workers: each call advances one atomic index, so
/// concurrent callers never skip or repeat a slot.
#[derive(Debug)]
pub struct TargetResolver {
    urls: Vec<String>,
    next: AtomicUsize,
}

impl TargetResolver {
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` when `base_url` is not a valid
    /// absolute http(s) URL.
    pub fn new(base_url: &str, suffixes: &[String]) -> Result<Self, ConfigError> {
        validate_base_url(base_url)?;
        let urls = if suffixes.is_empty() {
            vec![base_url.to_owned()]
        } else {
            suffixes
                .iter()
                .map(|suffix| join_suffix(base_url, suffix))
                .collect()
        };
        Ok(Self {
            urls,
            next: AtomicUsize::new(0),
        })
    }

    /// Next URL in round-robin order. Never exhausts.
    #[must_use]
    pub fn next_url(&self) -> &str {
        if let [only] = self.urls.as_slice() {
            return only;
        }
        let slot = self.next.fetch_add(1, Ordering::Relaxed);
        let index = slot.checked_rem(self.urls.len()).unwrap_or(0);
        self.urls.get(index).map_or("", String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

fn join_suffix(base_url: &str, suffix: &str) -> String {
    if base_url.ends_with('/')
        && let Some(stripped) = suffix.strip_prefix('/')
    {
        return format!("{}{}", base_url, stripped);
    }
    format!("{}{}", base_url, suffix)
}
