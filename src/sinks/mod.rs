//! Result exporters: JSON file, Prometheus push gateway and CloudWatch.
pub mod cloudwatch;
pub mod config;
mod format;
pub mod json;
pub mod prometheus;
mod writers;


pub use config::{
    CloudWatchSettings, DEFAULT_CLOUDWATCH_NAMESPACE, DEFAULT_JSON_METRICS_FILE, ExportSettings,
};
pub use writers::write_sinks;
