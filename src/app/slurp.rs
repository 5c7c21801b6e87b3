use std::path::PathBuf;

use crate::error::ConfigError;
use crate::http::DEFAULT_USER_AGENT;

/// Reads the newline-separated URL suffixes at `location`, a local path or
/// an `http(s)://` URL. Blank lines are skipped and order is kept.
///
/// # Errors
///
/// Returns an error when the source cannot be read or has no suffixes.
pub async fn load_suffixes(location: &str) -> Result<Vec<String>, ConfigError> {
    let content = if is_remote(location) {
        fetch_remote(location).await?
    } else {
        tokio::fs::read_to_string(location)
            .await
            .map_err(|err| ConfigError::ReadSuffixes {
                path: PathBuf::from(location),
                source: err,
            })?
    };

    let suffixes = parse_suffixes(&content);
    if suffixes.is_empty() {
        return Err(ConfigError::SuffixesEmpty {
            location: location.to_owned(),
        });
    }
    tracing::debug!("Loaded {} URL suffixes from {}", suffixes.len(), location);
    Ok(suffixes)
}

fn is_remote(location: &str) -> bool {
    let lower = location.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

async fn fetch_remote(url: &str) -> Result<String, ConfigError> {
    let fetch_error = |err: reqwest::Error| ConfigError::FetchSuffixes {
        url: url.to_owned(),
        source: err,
    };
    let client = reqwest::Client::builder()
        .user_agent(DEFAULT_USER_AGENT)
        .build()
        .map_err(|err| ConfigError::BuildClient { source: err })?;
    client
        .get(url)
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(fetch_error)?
        .text()
        .await
        .map_err(fetch_error)
}

pub(super) fn parse_suffixes(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}
