//! Chat server timestamp parsing
//!
//! The server stamps messages with a narrow ISO 8601 profile:
//! `YYYY-MM-DDTHH:MM:SS[.fff…]Z`, always UTC. Only that profile is accepted;
//! numeric offsets and other ISO variants are rejected.

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Errors produced when a timestamp does not match the server profile
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimestampError {
    /// Text does not follow `YYYY-MM-DDTHH:MM:SS[.f]Z`
    #[error("Unsupported timestamp format: {0}")]
    Format(String),

    /// Fields parsed but do not form a valid calendar date or time
    #[error("Timestamp out of range: {0}")]
    OutOfRange(String),
}

fn profile() -> &'static Regex {
    static PROFILE: OnceLock<Regex> = OnceLock::new();
    PROFILE.get_or_init(|| {
        Regex::new(r"^([0-9]{4})-([0-9]{2})-([0-9]{2})T([0-9]{2}):([0-9]{2}):([0-9]{2})(?:\.([0-9]+))?Z$")
            .expect("timestamp profile regex is valid")
    })
}

/// Parse a server timestamp into a UTC instant
///
/// ```
/// use chatpoll::model::parse_timestamp;
///
/// let ts = parse_timestamp("2013-05-01T12:34:56.789Z").unwrap();
/// assert_eq!(ts.timestamp_subsec_millis(), 789);
/// ```
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, TimestampError> {
    let caps = profile()
        .captures(s)
        .ok_or_else(|| TimestampError::Format(s.to_string()))?;

    // Groups are fixed-width ASCII digits, parsing cannot fail
    let field = |i: usize| -> u32 { caps[i].parse().unwrap_or(u32::MAX) };
    let year: i32 = caps[1]
        .parse()
        .map_err(|_| TimestampError::Format(s.to_string()))?;

    let nanos = match caps.get(7) {
        Some(frac) => fraction_to_nanos(frac.as_str()),
        None => 0,
    };

    let date = NaiveDate::from_ymd_opt(year, field(2), field(3))
        .ok_or_else(|| TimestampError::OutOfRange(s.to_string()))?;
    let datetime = date
        .and_hms_nano_opt(field(4), field(5), field(6), nanos)
        .ok_or_else(|| TimestampError::OutOfRange(s.to_string()))?;

    Ok(datetime.and_utc())
}

/// Interpret fractional-second digits as a decimal fraction, truncated to nanoseconds
fn fraction_to_nanos(digits: &str) -> u32 {
    let mut nanos: u32 = 0;
    let mut scale: u32 = 100_000_000;
    for b in digits.bytes().take(9) {
        nanos += u32::from(b - b'0') * scale;
        scale /= 10;
    }
    nanos
}
