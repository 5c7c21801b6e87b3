use std::fmt::Write as _;

use crate::error::{AppError, AppResult, SinkError};
use crate::metrics::ResultMetrics;

pub(super) fn write_line(output: &mut String, line: &str) -> AppResult<()> {
    writeln!(output, "{}", line).map_err(|err| AppError::sink(SinkError::WriteLine { source: err }))
}

/// Every exported value, in export order, as `(name, value)`.
///
/// Durations are milliseconds.
pub(super) fn metric_values(metrics: &ResultMetrics) -> [(&'static str, f64); 13] {
    [
        ("total_requests", metrics.total_requests as f64),
        ("failed_requests", metrics.failed_requests as f64),
        ("requests_per_second", metrics.requests_per_second),
        ("dns_median_ms", metrics.dns_median),
        ("tcp_connect_mean_ms", metrics.tcp_stats.mean),
        ("tcp_connect_median_ms", metrics.tcp_stats.median),
        ("tcp_connect_p95_ms", metrics.tcp_stats.p95),
        ("server_processing_mean_ms", metrics.processing_stats.mean),
        ("server_processing_median_ms", metrics.processing_stats.median),
        ("server_processing_p95_ms", metrics.processing_stats.p95),
        ("content_transfer_mean_ms", metrics.content_stats.mean),
        ("content_transfer_median_ms", metrics.content_stats.median),
        ("content_transfer_p95_ms", metrics.content_stats.p95),
    ]
}

/// Escapes a Prometheus label value.
pub(super) fn escape_label(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            other => escaped.push(other),
        }
    }
    escaped
}
