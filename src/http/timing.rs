use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::task::{Context, Poll};
use std::time::Duration;

use reqwest::dns::{Addrs, Name, Resolve, Resolving};
use tokio::time::Instant;
use tower::{Layer, Service};

/// Phase timings collected from client hooks for the exchange in flight.
///
/// One probe belongs to one worker client, and a worker runs one exchange at
/// a time, so everything recorded between `reset` and the response belongs
/// to that exchange. Hooks that never fire leave their phase at zero.
#[derive(Debug, Default)]
pub struct PhaseProbe {
    dns_nanos: AtomicU64,
    connect_nanos: AtomicU64,
    dns_failed: AtomicBool,
}

impl PhaseProbe {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reset(&self) {
        self.dns_nanos.store(0, Ordering::Relaxed);
        self.connect_nanos.store(0, Ordering::Relaxed);
        self.dns_failed.store(false, Ordering::Relaxed);
    }

    /// Total time spent in DNS lookups since the last reset.
    #[must_use]
    pub fn dns(&self) -> Duration {
        Duration::from_nanos(self.dns_nanos.load(Ordering::Relaxed))
    }

    /// Total time spent establishing connections since the last reset,
    /// including the DNS lookups made by the connector.
    #[must_use]
    pub fn connect(&self) -> Duration {
        Duration::from_nanos(self.connect_nanos.load(Ordering::Relaxed))
    }

    #[must_use]
    pub fn dns_failed(&self) -> bool {
        self.dns_failed.load(Ordering::Relaxed)
    }

    fn record_dns(&self, elapsed: Duration) {
        self.dns_nanos
            .fetch_add(duration_nanos(elapsed), Ordering::Relaxed);
    }

    fn record_connect(&self, elapsed: Duration) {
        self.connect_nanos
            .fetch_add(duration_nanos(elapsed), Ordering::Relaxed);
    }
}

fn duration_nanos(value: Duration) -> u64 {
    u64::try_from(value.as_nanos()).unwrap_or(u64::MAX)
}

/// DNS resolver that reports lookup time to a probe.
#[derive(Debug, Clone)]
pub(super) struct TimedResolver {
    probe: Arc<PhaseProbe>,
}

impl TimedResolver {
    pub(super) const fn new(probe: Arc<PhaseProbe>) -> Self {
        Self { probe }
    }
}

impl Resolve for TimedResolver {
    fn resolve(&self, name: Name) -> Resolving {
        let probe = Arc::clone(&self.probe);
        Box::pin(async move {
            let started = Instant::now();
            let lookup = tokio::net::lookup_host((name.as_str(), 0)).await;
            probe.record_dns(started.elapsed());
            let resolved: Result<Addrs, Box<dyn std::error::Error + Send + Sync>> = match lookup {
                Ok(addrs) => Ok(Box::new(addrs.collect::<Vec<_>>().into_iter())),
                Err(err) => {
                    probe.dns_failed.store(true, Ordering::Relaxed);
                    Err(Box::new(err))
                }
            };
            resolved
        })
    }
}

/// Connector layer that reports connection setup time to a probe.
#[derive(Debug, Clone)]
pub(super) struct ConnectTimingLayer {
    probe: Arc<PhaseProbe>,
}

impl ConnectTimingLayer {
    pub(super) const fn new(probe: Arc<PhaseProbe>) -> Self {
        Self { probe }
    }
}

impl<S> Layer<S> for ConnectTimingLayer {
    type Service = ConnectTiming<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ConnectTiming {
            inner,
            probe: Arc::clone(&self.probe),
        }
    }
}

#[derive(Debug, Clone)]
pub(super) struct ConnectTiming<S> {
    inner: S,
    probe: Arc<PhaseProbe>,
}

impl<S, Target> Service<Target> for ConnectTiming<S>
where
    S: Service<Target>,
    S::Future: Send + 'static,
    S::Response: Send + 'static,
    S::Error: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<S::Response, S::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, target: Target) -> Self::Future {
        let probe = Arc::clone(&self.probe);
        let started = Instant::now();
        let connecting = self.inner.call(target);
        Box::pin(async move {
            let connected = connecting.await;
            probe.record_connect(started.elapsed());
            connected
        })
    }
}
