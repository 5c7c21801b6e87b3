use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::domain::Termination;
use crate::metrics::RequestOutcome;

use super::instrument::RequestInstrumentor;
use super::targets::TargetResolver;

/// Shared gate deciding whether a worker may start another request.
#[derive(Debug)]
pub(in crate::http) enum WorkClaim {
    Count { limit: u64, issued: AtomicU64 },
    Deadline { started: Instant, duration: Duration },
}

impl WorkClaim {
    pub(in crate::http) fn new(termination: Termination, started: Instant) -> Self {
        match termination {
            Termination::FixedCount(limit) => WorkClaim::Count {
                limit: limit.get(),
                issued: AtomicU64::new(0),
            },
            Termination::Duration(duration) => WorkClaim::Deadline { started, duration },
        }
    }

    /// Claims one unit of work. Under a count limit exactly `limit` claims
    /// succeed across all callers; under a deadline claims succeed until it
    /// passes.
    pub(in crate::http) fn try_claim(&self) -> bool {
        match self {
            WorkClaim::Count { limit, issued } => loop {
                let current = issued.load(Ordering::Relaxed);
                if current >= *limit {
                    return false;
                }
                let Some(next) = current.checked_add(1) else {
                    return false;
                };
                if issued
                    .compare_exchange(current, next, Ordering::Relaxed, Ordering::Relaxed)
                    .is_ok()
                {
                    return true;
                }
            },
            WorkClaim::Deadline { started, duration } => started.elapsed() < *duration,
        }
    }
}

pub(in crate::http) struct WorkerContext {
    pub(in crate::http) worker_id: usize,
    pub(in crate::http) instrumentor: RequestInstrumentor,
    pub(in crate::http) targets: Arc<TargetResolver>,
    pub(in crate::http) claim: Arc<WorkClaim>,
    pub(in crate::http) outcome_tx: mpsc::Sender<RequestOutcome>,
}

/// Runs one worker until its claims are refused. Returns how many exchanges
/// it delivered.
pub(in crate::http) async fn run_worker(context: WorkerContext) -> u64 {
    let WorkerContext {
        worker_id,
        instrumentor,
        targets,
        claim,
        outcome_tx,
    } = context;

    let mut delivered: u64 = 0;
    while claim.try_claim() {
        let url = targets.next_url();
        let outcome = instrumentor.execute(url).await;
        if outcome_tx.send(outcome).await.is_err() {
            warn!("Worker {} lost the aggregator; stopping.", worker_id);
            break;
        }
        delivered = delivered.saturating_add(1);
    }

    debug!("Worker {} stopped after {} requests.", worker_id, delivered);
    delivered
}
