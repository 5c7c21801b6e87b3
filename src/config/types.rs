use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

use super::parse::parse_duration_value;

/// Contents of `cassowary.toml` / `cassowary.json`. Every field is optional
/// and mirrors the `run` flag of the same name.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub url: Option<String>,
    pub concurrency: Option<usize>,
    pub requests: Option<u64>,
    pub duration: Option<DurationValue>,
    pub timeout: Option<DurationValue>,
    pub file: Option<String>,
    pub header: Option<String>,
    pub postfile: Option<PathBuf>,
    pub putfile: Option<PathBuf>,
    pub patchfile: Option<PathBuf>,
    pub content_type: Option<String>,
    pub disable_keep_alive: Option<bool>,
    pub ca: Option<PathBuf>,
    pub cert: Option<PathBuf>,
    pub key: Option<PathBuf>,
    pub json_metrics: Option<bool>,
    pub json_metrics_file: Option<PathBuf>,
    #[serde(alias = "prometheus_gateway")]
    pub prompushgwurl: Option<String>,
    pub cloudwatch: Option<bool>,
    pub cloudwatch_namespace: Option<String>,
    pub plugin: Option<PathBuf>,
    pub metrics_max: Option<usize>,
}

/// A duration written either as whole seconds or as text like `"500ms"`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> Result<Duration, ConfigError> {
        match self {
            DurationValue::Seconds(secs) => Ok(Duration::from_secs(*secs)),
            DurationValue::Text(text) => parse_duration_value(text),
        }
    }
}
