use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PluginError {
    #[error("Failed to start plugin '{path}': {source}")]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Plugin handshake failed: {reason}")]
    Handshake { reason: String },
    #[error("Incompatible plugin protocol version: expected {expected}, found '{found}'.")]
    ProtocolVersion { expected: u32, found: String },
    #[error("Plugin I/O error: {source}")]
    Io {
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to decode plugin reply: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
    },
    #[error("Plugin did not answer within {secs}s.")]
    Timeout { secs: u64 },
    #[error("plugin returned error: {0}")]
    Initialization(String),
}
