mod app;
mod config;
mod http;
mod metrics;
mod plugin;
mod sink;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use http::RequestError;
pub use metrics::MetricsError;
pub use plugin::PluginError;
pub use sink::SinkError;
