use std::path::PathBuf;

/// Default target of `--json-metrics` without `--json-metrics-file`.
pub const DEFAULT_JSON_METRICS_FILE: &str = "out.json";
/// CloudWatch namespace used unless overridden.
pub const DEFAULT_CLOUDWATCH_NAMESPACE: &str = "cassowary";

/// Where finished results are sent after the summary is printed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSettings {
    pub json_file: Option<PathBuf>,
    pub prometheus_gateway: Option<String>,
    pub cloudwatch: Option<CloudWatchSettings>,
}

impl ExportSettings {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.json_file.is_none() && self.prometheus_gateway.is_none() && self.cloudwatch.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudWatchSettings {
    pub namespace: String,
}

impl Default for CloudWatchSettings {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_CLOUDWATCH_NAMESPACE.to_owned(),
        }
    }
}
