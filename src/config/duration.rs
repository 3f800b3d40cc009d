//! Compact duration strings: `50ms`, `30s`, `5m`, `2h`

use std::time::Duration;

use crate::error::ConfigError;

/// Parse `<digits><unit>` where unit is one of `ms`, `s`, `m`, `h`
///
/// `option` names the setting being parsed and only feeds the error.
pub(crate) fn parse_duration(option: &str, value: &str) -> Result<Duration, ConfigError> {
    let invalid = || ConfigError::InvalidDuration {
        option: option.to_string(),
        value: value.to_string(),
    };

    let split = value
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(invalid)?;
    let (digits, unit) = value.split_at(split);
    if digits.is_empty() {
        return Err(invalid());
    }
    let amount: u64 = digits.parse().map_err(|_| invalid())?;

    let duration = match unit {
        "ms" => Duration::from_millis(amount),
        "s" => Duration::from_secs(amount),
        "m" => Duration::from_secs(amount.checked_mul(60).ok_or_else(invalid)?),
        "h" => Duration::from_secs(amount.checked_mul(3600).ok_or_else(invalid)?),
        _ => return Err(invalid()),
    };
    Ok(duration)
}
