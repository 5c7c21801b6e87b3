use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command};
use tracing::debug;

use crate::error::PluginError;

use super::InitHook;

const CORE_PROTOCOL_VERSION: &str = "1";
const PROTOCOL_VERSIONS_ENV: &str = "PLUGIN_PROTOCOL_VERSIONS";
const TRANSPORT: &str = "stdio";
const ENCODING: &str = "json";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Values both sides must agree on before the plugin is trusted.
///
/// The cookie only guards against launching something that is not a plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandshakeConfig {
    pub protocol_version: u32,
    pub magic_cookie_key: String,
    pub magic_cookie_value: String,
}

impl Default for HandshakeConfig {
    fn default() -> Self {
        Self {
            protocol_version: 1,
            magic_cookie_key: "BASIC_PLUGIN".to_owned(),
            magic_cookie_value: "hello".to_owned(),
        }
    }
}

impl HandshakeConfig {
    /// Checks the `CORE|APP|stdio|json` line a plugin prints on start.
    fn verify(&self, line: &str) -> Result<(), PluginError> {
        let parts: Vec<&str> = line.trim().split('|').collect();
        let [core, app, transport, encoding] = parts.as_slice() else {
            return Err(PluginError::Handshake {
                reason: format!("malformed handshake line '{}'", line.trim()),
            });
        };
        if *core != CORE_PROTOCOL_VERSION {
            return Err(PluginError::Handshake {
                reason: format!("unsupported core protocol '{}'", core),
            });
        }
        if app.parse::<u32>().ok() != Some(self.protocol_version) {
            return Err(PluginError::ProtocolVersion {
                expected: self.protocol_version,
                found: (*app).to_owned(),
            });
        }
        if *transport != TRANSPORT || *encoding != ENCODING {
            return Err(PluginError::Handshake {
                reason: format!("unsupported transport '{}|{}'", transport, encoding),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct InitRequest<'req> {
    method: &'req str,
}

#[derive(Debug, Deserialize)]
struct InitReply {
    #[serde(default)]
    error: String,
}

/// Plugin executable that is started, asked to initialize, then killed.
#[derive(Debug, Clone)]
pub struct SubprocessPlugin {
    path: PathBuf,
    args: Vec<OsString>,
    handshake: HandshakeConfig,
    timeout: Duration,
}

impl SubprocessPlugin {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            args: Vec::new(),
            handshake: HandshakeConfig::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_handshake(mut self, handshake: HandshakeConfig) -> Self {
        self.handshake = handshake;
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn exchange(&self, child: &mut Child) -> Result<(), PluginError> {
        let stdout = child.stdout.take().ok_or_else(|| PluginError::Handshake {
            reason: "plugin stdout is not captured".to_owned(),
        })?;
        let mut stdin = child.stdin.take().ok_or_else(|| PluginError::Handshake {
            reason: "plugin stdin is not captured".to_owned(),
        })?;
        let mut lines = BufReader::new(stdout).lines();

        let handshake = lines
            .next_line()
            .await
            .map_err(|err| PluginError::Io { source: err })?
            .ok_or_else(|| PluginError::Handshake {
                reason: "plugin exited before the handshake".to_owned(),
            })?;
        self.handshake.verify(&handshake)?;
        debug!("Plugin {} completed handshake", self.path.display());

        let mut request = serde_json::to_vec(&InitRequest {
            method: "Plugin.Init",
        })
        .map_err(|err| PluginError::Decode { source: err })?;
        request.push(b'\n');
        stdin
            .write_all(&request)
            .await
            .map_err(|err| PluginError::Io { source: err })?;
        stdin
            .flush()
            .await
            .map_err(|err| PluginError::Io { source: err })?;

        let reply = lines
            .next_line()
            .await
            .map_err(|err| PluginError::Io { source: err })?
            .ok_or_else(|| PluginError::Handshake {
                reason: "plugin exited before replying".to_owned(),
            })?;
        let reply: InitReply =
            serde_json::from_str(reply.trim()).map_err(|err| PluginError::Decode { source: err })?;

        if reply.error.is_empty() {
            Ok(())
        } else {
            Err(PluginError::Initialization(reply.error))
        }
    }
}

#[async_trait]
impl InitHook for SubprocessPlugin {
    async fn init(&self) -> Result<(), PluginError> {
        let mut child = Command::new(&self.path)
            .args(&self.args)
            .env(
                &self.handshake.magic_cookie_key,
                &self.handshake.magic_cookie_value,
            )
            .env(
                PROTOCOL_VERSIONS_ENV,
                self.handshake.protocol_version.to_string(),
            )
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| PluginError::Spawn {
                path: self.path.clone(),
                source: err,
            })?;

        let result = match tokio::time::timeout(self.timeout, self.exchange(&mut child)).await {
            Ok(result) => result,
            Err(_elapsed) => Err(PluginError::Timeout {
                secs: self.timeout.as_secs(),
            }),
        };

        if let Err(err) = child.kill().await {
            debug!("Plugin {} already exited: {}", self.path.display(), err);
        }
        result
    }
}
