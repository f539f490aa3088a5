//! Duration parsing utilities.

use std::time::Duration;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DurationParseError {
    #[error("Empty duration string")]
    Empty,

    #[error("Invalid duration value: {0}")]
    Invalid(String),
}

/// Parse a duration string like "1h", "30m", "300s", "250ms", "300".
///
/// Supports:
/// - Plain numbers (interpreted as seconds): "300"
/// - Milliseconds suffix: "250ms"
/// - Seconds suffix: "300s"
/// - Minutes suffix: "30m"
/// - Hours suffix: "1h"
pub fn parse_duration(s: &str) -> Result<Duration, DurationParseError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(DurationParseError::Empty);
    }

    let invalid = || DurationParseError::Invalid(s.to_string());
    let parse = |num_str: &str| num_str.trim().parse::<u64>().map_err(|_| invalid());

    // "ms" must be checked before "m" and "s"
    if let Some(num_str) = s.strip_suffix("ms") {
        return Ok(Duration::from_millis(parse(num_str)?));
    }
    if let Some(num_str) = s.strip_suffix('h') {
        let secs = parse(num_str)?.checked_mul(3600).ok_or_else(invalid)?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(num_str) = s.strip_suffix('m') {
        let secs = parse(num_str)?.checked_mul(60).ok_or_else(invalid)?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(num_str) = s.strip_suffix('s') {
        return Ok(Duration::from_secs(parse(num_str)?));
    }

    // No suffix - treat as seconds
    Ok(Duration::from_secs(parse(s)?))
}
