use chrono::TimeDelta;
use std::time::Duration;

use crate::error::ConfigError;

/// Parse duration string (e.g., "30s", "5m", "2h") into Duration
pub fn parse_duration(s: &str) -> Result<Duration, ConfigError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ConfigError::InvalidValue("empty duration string".to_string()));
    }

    let (num_str, multiplier) = if let Some(stripped) = s.strip_suffix('s') {
        (stripped, 1)
    } else if let Some(stripped) = s.strip_suffix('m') {
        (stripped, 60)
    } else if let Some(stripped) = s.strip_suffix('h') {
        (stripped, 3600)
    } else {
        return Err(ConfigError::InvalidValue(format!(
            "duration must end with 's', 'm', or 'h': {}",
            s
        )));
    };

    let num: u64 = num_str
        .parse()
        .map_err(|_| ConfigError::InvalidValue(format!("invalid number in duration: {}", s)))?;

    num.checked_mul(multiplier)
        .map(Duration::from_secs)
        .ok_or_else(|| ConfigError::InvalidValue(format!("duration out of range: {}", s)))
}

/// Whole seconds from configuration as a signed span for date arithmetic
pub fn seconds_span(field: &str, seconds: u64) -> Result<TimeDelta, ConfigError> {
    i64::try_from(seconds)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .ok_or_else(|| ConfigError::InvalidValue(format!("{} is out of range: {}", field, seconds)))
}
