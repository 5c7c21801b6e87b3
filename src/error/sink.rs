use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to serialize metrics to JSON: {source}")]
    SerializeJson {
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to write JSON metrics '{path}': {source}")]
    WriteJson {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to format metrics line: {source}")]
    WriteLine {
        #[source]
        source: std::fmt::Error,
    },
    #[error("Failed to push metrics to Prometheus gateway: {source}")]
    PushPrometheus {
        #[source]
        source: reqwest::Error,
    },
    #[error("Prometheus gateway rejected metrics with status {code}.")]
    PrometheusStatus { code: u16 },
    #[error("Missing AWS credentials: {missing} is not set.")]
    CloudWatchCredentials { missing: &'static str },
    #[error("Failed to sign CloudWatch request: {source}")]
    CloudWatchSign {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("Failed to push metrics to CloudWatch: {source}")]
    PushCloudWatch {
        #[source]
        source: reqwest::Error,
    },
    #[error("CloudWatch rejected metrics with status {code}: {body}")]
    CloudWatchStatus { code: u16, body: String },
}
