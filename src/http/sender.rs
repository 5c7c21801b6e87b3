use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::domain::RunConfiguration;
use crate::error::{AppError, AppResult, ConfigError, MetricsError};
use crate::metrics::{ResultMetrics, spawn_aggregator};

use super::instrument::RequestInstrumentor;
use super::targets::TargetResolver;
use super::workload::{WorkClaim, WorkerContext, run_worker};

/// Upper bound on outcomes buffered between workers and the aggregator.
const OUTCOME_CHANNEL_CAPACITY: usize = 4096;

/// Owns the worker pool and the termination policy of one run.
#[derive(Debug)]
pub struct WorkerCoordinator {
    config: Arc<RunConfiguration>,
    targets: Arc<TargetResolver>,
}

impl WorkerCoordinator {
    /// # Errors
    ///
    /// Returns an error when the base URL is not a valid http(s) URL.
    pub fn new(config: RunConfiguration) -> Result<Self, ConfigError> {
        let targets = TargetResolver::new(&config.base_url, &config.url_suffixes)?;
        Ok(Self {
            config: Arc::new(config),
            targets: Arc::new(targets),
        })
    }

    /// Drives `concurrency` workers until the termination policy stops them,
    /// waits for every in-flight exchange and returns the aggregate.
    ///
    /// # Errors
    ///
    /// Returns an error when a worker client cannot be built (before any
    /// request is sent), when a worker task panics, or when aggregation fails.
    pub async fn run(&self) -> AppResult<ResultMetrics> {
        let config = &self.config;
        let concurrency = config.concurrency.get();

        let first = RequestInstrumentor::new(config)?;
        let mut instrumentors = Vec::with_capacity(concurrency);
        for _ in 1..concurrency {
            instrumentors.push(first.sibling(config)?);
        }
        instrumentors.push(first);

        let (outcome_tx, outcome_rx) =
            mpsc::channel(OUTCOME_CHANNEL_CAPACITY.min(concurrency.saturating_mul(64)));
        let aggregator = spawn_aggregator(outcome_rx, config.metrics_max);

        info!(
            "Starting {} workers against {} ({}).",
            concurrency, config.base_url, config.termination
        );
        let started = Instant::now();
        let claim = Arc::new(WorkClaim::new(config.termination, started));

        let mut handles = Vec::with_capacity(concurrency);
        for (worker_id, instrumentor) in instrumentors.into_iter().enumerate() {
            let context = WorkerContext {
                worker_id,
                instrumentor,
                targets: Arc::clone(&self.targets),
                claim: Arc::clone(&claim),
                outcome_tx: outcome_tx.clone(),
            };
            handles.push(tokio::spawn(run_worker(context)));
        }
        drop(outcome_tx);

        let mut delivered: u64 = 0;
        for handle in handles {
            delivered = delivered.saturating_add(handle.await?);
        }
        let elapsed = started.elapsed();
        debug!(
            "All workers stopped after {}ms with {} requests.",
            elapsed.as_millis(),
            delivered
        );

        let aggregator = aggregator.await.map_err(|err| {
            if err.is_panic() {
                AppError::from(err)
            } else {
                AppError::metrics(MetricsError::AggregatorClosed)
            }
        })??;

        Ok(aggregator.finish(&config.base_url, elapsed))
    }
}
