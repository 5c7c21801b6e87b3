//! Initialization hook run before any load is generated.
mod subprocess;


use async_trait::async_trait;

use crate::error::PluginError;

pub use subprocess::{HandshakeConfig, SubprocessPlugin};

/// Capability to run setup logic before a run starts.
///
/// A failing hook aborts the run before any request is issued.
#[async_trait]
pub trait InitHook: Send + Sync {
    /// # Errors
    ///
    /// Returns the hook's failure, which the run reports unchanged.
    async fn init(&self) -> Result<(), PluginError>;
}

/// Hook used when no plugin is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPlugin;

#[async_trait]
impl InitHook for NoopPlugin {
    async fn init(&self) -> Result<(), PluginError> {
        Ok(())
    }
}
