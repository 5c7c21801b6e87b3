use std::time::Duration;

use crate::error::ConfigError;

/// Parses a number with an optional `ms`, `s`, `m` or `h` unit. A bare
/// number is seconds. Zero is accepted; callers decide whether it is valid.
pub(crate) fn parse_duration_value(value: &str) -> Result<Duration, ConfigError> {
    let value = value.trim();
    let invalid = |reason: &str| ConfigError::InvalidDuration {
        value: value.to_owned(),
        reason: reason.to_owned(),
    };
    if value.is_empty() {
        return Err(invalid("must not be empty"));
    }

    let digits_len = value.chars().take_while(char::is_ascii_digit).count();
    if digits_len == 0 {
        return Err(invalid("expected a number"));
    }
    let (num_part, unit_part) = value.split_at(digits_len);
    let number: u64 = num_part.parse().map_err(|err| ConfigError::InvalidDuration {
        value: value.to_owned(),
        reason: format!("{}", err),
    })?;

    let unit = if unit_part.is_empty() { "s" } else { unit_part };
    let duration = match unit {
        "ms" => Duration::from_millis(number),
        "s" => Duration::from_secs(number),
        "m" => {
            let secs = number.checked_mul(60).ok_or_else(|| invalid("overflow"))?;
            Duration::from_secs(secs)
        }
        "h" => {
            let secs = number
                .checked_mul(60)
                .and_then(|seconds| seconds.checked_mul(60))
                .ok_or_else(|| invalid("overflow"))?;
            Duration::from_secs(secs)
        }
        _ => return Err(invalid("unknown unit, use ms, s, m or h")),
    };

    Ok(duration)
}
