//! Request execution: target selection, per-phase instrumentation and the
//! worker pool that drives them.
mod client;
mod instrument;
mod sender;
mod targets;
mod timing;
mod tls;
mod workload;


pub use client::{DEFAULT_USER_AGENT, build_client};
pub use instrument::RequestInstrumentor;
pub use sender::WorkerCoordinator;
pub use targets::{TargetResolver, validate_base_url};
pub use timing::PhaseProbe;
pub use tls::load_tls_materials;
