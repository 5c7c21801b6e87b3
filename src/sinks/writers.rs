use std::time::Duration;

use reqwest::Client;

use crate::error::{AppError, AppResult, ConfigError};
use crate::http::DEFAULT_USER_AGENT;
use crate::metrics::ResultMetrics;

use super::cloudwatch::push_cloudwatch;
use super::config::ExportSettings;
use super::json::write_json;
use super::prometheus::push_prometheus;

const EXPORT_TIMEOUT: Duration = Duration::from_secs(30);

/// Sends results to every configured exporter: JSON file, then the
/// Prometheus push gateway, then CloudWatch. Stops at the first failure.
///
/// # Errors
///
/// Returns the first exporter error.
pub async fn write_sinks(settings: &ExportSettings, metrics: &ResultMetrics) -> AppResult<()> {
    if let Some(path) = settings.json_file.as_deref() {
        write_json(path, metrics).await?;
    }
    if settings.prometheus_gateway.is_none() && settings.cloudwatch.is_none() {
        return Ok(());
    }

    let client = export_client()?;
    if let Some(gateway) = settings.prometheus_gateway.as_deref() {
        push_prometheus(&client, gateway, metrics).await?;
    }
    if let Some(cloudwatch) = settings.cloudwatch.as_ref() {
        push_cloudwatch(&client, cloudwatch, metrics).await?;
    }
    Ok(())
}

fn export_client() -> AppResult<Client> {
    Client::builder()
        .timeout(EXPORT_TIMEOUT)
        .user_agent(DEFAULT_USER_AGENT)
        .build()
        .map_err(|err| AppError::config(ConfigError::BuildClient { source: err }))
}
