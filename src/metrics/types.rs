use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Timing breakdown of one HTTP exchange.
///
/// Phases skipped by connection reuse are `Duration::ZERO`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct RequestOutcome {
    pub dns_lookup: Duration,
    pub tcp_connect: Duration,
    pub server_processing: Duration,
    pub content_transfer: Duration,
    pub total: Duration,
    pub succeeded: bool,
}

impl RequestOutcome {
    /// Outcome for an exchange that failed before producing a usable response.
    #[must_use]
    pub const fn failed(total: Duration) -> Self {
        Self {
            dns_lookup: Duration::ZERO,
            tcp_connect: Duration::ZERO,
            server_processing: Duration::ZERO,
            content_transfer: Duration::ZERO,
            total,
            succeeded: false,
        }
    }
}

/// Mean, median and 95th percentile of one phase, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PhaseStats {
    pub mean: f64,
    pub median: f64,
    #[serde(rename = "95th_percentile")]
    pub p95: f64,
}

/// Final statistics of a run. Durations are milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultMetrics {
    pub base_url: String,
    pub total_requests: u64,
    pub failed_requests: u64,
    pub requests_per_second: f64,
    pub dns_median: f64,
    #[serde(rename = "tcp_connect")]
    pub tcp_stats: PhaseStats,
    #[serde(rename = "server_processing")]
    pub processing_stats: PhaseStats,
    #[serde(rename = "content_transfer")]
    pub content_stats: PhaseStats,
    pub elapsed_seconds: f64,
}

impl ResultMetrics {
    #[must_use]
    pub const fn succeeded_requests(&self) -> u64 {
        self.total_requests.saturating_sub(self.failed_requests)
    }
}
