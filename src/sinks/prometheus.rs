use reqwest::Client;

use crate::error::{AppError, AppResult, SinkError};
use crate::metrics::ResultMetrics;

use super::format::{escape_label, metric_values, write_line};

/// Push gateway job every sample is grouped under.
pub const PROMETHEUS_JOB: &str = "cassowary";

/// Renders `metrics` in the Prometheus text exposition format.
///
/// # Errors
///
/// Returns an error when a line cannot be formatted.
pub fn render_prometheus(metrics: &ResultMetrics) -> AppResult<String> {
    let mut output = String::new();
    let label = escape_label(&metrics.base_url);
    for (name, value) in metric_values(metrics) {
        write_line(&mut output, &format!("# TYPE cassowary_{} gauge", name))?;
        write_line(
            &mut output,
            &format!("cassowary_{}{{url=\"{}\"}} {}", name, label, value),
        )?;
    }
    Ok(output)
}

/// Push gateway endpoint for the cassowary job.
#[must_use]
pub fn push_url(gateway: &str) -> String {
    format!(
        "{}/metrics/job/{}",
        gateway.trim_end_matches('/'),
        PROMETHEUS_JOB
    )
}

/// Replaces the job's metrics on the push gateway.
///
/// # Errors
///
/// Returns an error when the gateway is unreachable or answers non-2xx.
pub async fn push_prometheus(
    client: &Client,
    gateway: &str,
    metrics: &ResultMetrics,
) -> AppResult<()> {
    let body = render_prometheus(metrics)?;
    let url = push_url(gateway);
    let response = client
        .put(url.as_str())
        .header(
            reqwest::header::CONTENT_TYPE,
            "text/plain; version=0.0.4",
        )
        .body(body)
        .send()
        .await
        .map_err(|err| AppError::sink(SinkError::PushPrometheus { source: err }))?;

    let status = response.status();
    if !status.is_success() {
        return Err(AppError::sink(SinkError::PrometheusStatus {
            code: status.as_u16(),
        }));
    }
    tracing::info!("Pushed metrics to Prometheus gateway {}", url);
    Ok(())
}
