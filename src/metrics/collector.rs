use std::time::Duration;

use tokio::{sync::mpsc, task::JoinHandle};

use crate::error::MetricsError;

use super::{PhaseDistribution, RequestOutcome, ResultMetrics};

/// Running totals for one run.
///
/// Failed outcomes only move the counters; the phase distributions see
/// succeeded outcomes exclusively.
#[derive(Debug)]
pub struct StatsAggregator {
    total_requests: u64,
    failed_requests: u64,
    dns: PhaseDistribution,
    tcp: PhaseDistribution,
    processing: PhaseDistribution,
    content: PhaseDistribution,
}

impl StatsAggregator {
    #[must_use]
    pub const fn new(metrics_max: usize) -> Self {
        Self {
            total_requests: 0,
            failed_requests: 0,
            dns: PhaseDistribution::new(metrics_max),
            tcp: PhaseDistribution::new(metrics_max),
            processing: PhaseDistribution::new(metrics_max),
            content: PhaseDistribution::new(metrics_max),
        }
    }

    /// Fold one outcome into the totals.
    ///
    /// # Errors
    ///
    /// Returns an error if a phase distribution fails to switch to histogram
    /// mode.
    pub fn record(&mut self, outcome: &RequestOutcome) -> Result<(), MetricsError> {
        self.total_requests = self.total_requests.saturating_add(1);
        if !outcome.succeeded {
            self.failed_requests = self.failed_requests.saturating_add(1);
            return Ok(());
        }
        self.dns.record(outcome.dns_lookup)?;
        self.tcp.record(outcome.tcp_connect)?;
        self.processing.record(outcome.server_processing)?;
        self.content.record(outcome.content_transfer)?;
        Ok(())
    }

    #[must_use]
    pub const fn total_requests(&self) -> u64 {
        self.total_requests
    }

    /// Materialize the final metrics. `elapsed` is the run's wall-clock time.
    #[must_use]
    pub fn finish(mut self, base_url: &str, elapsed: Duration) -> ResultMetrics {
        let elapsed_seconds = elapsed.as_secs_f64();
        let requests_per_second = if elapsed_seconds > 0.0 {
            self.total_requests as f64 / elapsed_seconds
        } else {
            0.0
        };

        ResultMetrics {
            base_url: base_url.to_owned(),
            total_requests: self.total_requests,
            failed_requests: self.failed_requests,
            requests_per_second,
            dns_median: self.dns.quantile_ms(0.5),
            tcp_stats: self.tcp.summarize(),
            processing_stats: self.processing.summarize(),
            content_stats: self.content.summarize(),
            elapsed_seconds,
        }
    }
}

/// Spawn the single consumer that owns the aggregation state.
///
/// The task finishes once every sender is dropped, so awaiting the handle
/// is the barrier between the last worker and finalization.
#[must_use]
pub fn spawn_aggregator(
    mut outcome_rx: mpsc::Receiver<RequestOutcome>,
    metrics_max: usize,
) -> JoinHandle<Result<StatsAggregator, MetricsError>> {
    tokio::spawn(async move {
        let mut aggregator = StatsAggregator::new(metrics_max);
        while let Some(outcome) = outcome_rx.recv().await {
            aggregator.record(&outcome)?;
        }
        tracing::debug!(
            "Aggregated {} outcomes ({} failed).",
            aggregator.total_requests,
            aggregator.failed_requests
        );
        Ok(aggregator)
    })
}
