use std::time::Duration;

use crate::config::parse_duration_value;
use crate::error::ConfigError;

/// Parses `30`, `30s`, `500ms`, `2m` or `1h`. A bare number is seconds.
pub(crate) fn parse_duration_arg(s: &str) -> Result<Duration, ConfigError> {
    parse_duration_value(s)
}
