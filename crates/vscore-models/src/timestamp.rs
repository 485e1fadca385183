//! Timestamp parsing and formatting for editing steps.
//!
//! Editing steps carry both a display form (`MM:SS`) and whole seconds.
//! Responses from the analysis provider sometimes omit one of the two, so
//! both directions are needed when repairing a step.

/// Parse a timestamp string to whole seconds.
///
/// Supports formats:
/// - `HH:MM:SS`
/// - `MM:SS`
/// - `SS`
///
/// Fractional seconds are accepted and truncated.
///
/// # Examples
/// ```
/// use vscore_models::timestamp::parse_timestamp;
/// assert_eq!(parse_timestamp("01:30:00").unwrap(), 5400);
/// assert_eq!(parse_timestamp("00:25").unwrap(), 25);
/// assert_eq!(parse_timestamp("90").unwrap(), 90);
/// ```
pub fn parse_timestamp(ts: &str) -> Result<u32, TimestampError> {
    let ts = ts.trim();
    if ts.is_empty() {
        return Err(TimestampError::Empty);
    }

    let parts: Vec<&str> = ts.split(':').collect();
    if parts.len() > 3 {
        return Err(TimestampError::InvalidFormat(ts.to_string()));
    }

    let names = ["hours", "minutes", "seconds"];
    let offset = 3 - parts.len();

    let mut total = 0.0_f64;
    for (i, part) in parts.iter().enumerate() {
        let name = names[offset + i];
        let value: f64 = part
            .trim()
            .parse()
            .map_err(|_| TimestampError::InvalidValue(name, part.to_string()))?;
        if value < 0.0 || !value.is_finite() {
            return Err(TimestampError::Negative);
        }
        total = total * 60.0 + value;
    }

    if total > MAX_TIMESTAMP_SECS as f64 {
        return Err(TimestampError::TooLarge(total));
    }

    Ok(total as u32)
}

/// Format whole seconds as `MM:SS`.
///
/// Minutes are not wrapped into hours, so long offsets render as e.g. `75:00`.
///
/// # Examples
/// ```
/// use vscore_models::timestamp::format_mm_ss;
/// assert_eq!(format_mm_ss(5), "00:05");
/// assert_eq!(format_mm_ss(125), "02:05");
/// ```
pub fn format_mm_ss(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Whether `ts` is already a well-formed `MM:SS` string.
pub fn is_mm_ss(ts: &str) -> bool {
    match ts.as_bytes() {
        [m1, m2, b':', s1, s2] => {
            [m1, m2, s1, s2].iter().all(|b| b.is_ascii_digit()) && *s1 < b'6'
        }
        _ => false,
    }
}

/// Maximum accepted timestamp (24 hours in seconds).
pub const MAX_TIMESTAMP_SECS: u32 = 86_400;

/// Timestamp parsing errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimestampError {
    #[error("timestamp is empty")]
    Empty,
    #[error("invalid timestamp format: {0}")]
    InvalidFormat(String),
    #[error("invalid {0} value: {1}")]
    InvalidValue(&'static str, String),
    #[error("timestamp values cannot be negative")]
    Negative,
    #[error("timestamp {0} exceeds the maximum of 24 hours")]
    TooLarge(f64),
}
