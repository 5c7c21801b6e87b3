use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use crate::domain::RunConfiguration;
use crate::error::ConfigError;

use super::timing::{ConnectTimingLayer, PhaseProbe, TimedResolver};
use super::tls::apply_tls_materials;

pub const DEFAULT_USER_AGENT: &str = concat!("cassowary/", env!("CARGO_PKG_VERSION"));

/// Builds a worker's HTTP client with its phase hooks wired to `probe`.
///
/// # Errors
///
/// Returns `ConfigError::BuildClient` when the TLS backend rejects the
/// configuration.
pub fn build_client(
    config: &RunConfiguration,
    probe: &Arc<PhaseProbe>,
) -> Result<Client, ConfigError> {
    let mut builder = Client::builder()
        .timeout(config.timeout)
        .user_agent(DEFAULT_USER_AGENT)
        .dns_resolver(Arc::new(TimedResolver::new(Arc::clone(probe))))
        .connector_layer(ConnectTimingLayer::new(Arc::clone(probe)));

    if !config.keep_alive {
        builder = builder
            .pool_max_idle_per_host(0)
            .pool_idle_timeout(Some(Duration::from_secs(0)));
    }

    builder = apply_tls_materials(builder, &config.tls);

    builder
        .build()
        .map_err(|err| ConfigError::BuildClient { source: err })
}
