use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Ascii classes only, `\d` would also accept non-latin digits.
static CANONICAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{2,}):([0-9]{2}):([0-9]{2})(?:\.([0-9]{1,3}))?$")
        .expect("canonical timestamp pattern is valid")
});
static MILLIS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("millisecond pattern is valid"));

/// Shorthand zero that older files and the first chapter field were seeded with.
pub const LEGACY_ZERO: &str = "00:00:00.00";

const MILLIS_PER_SECOND: u64 = 1_000;
const MILLIS_PER_MINUTE: u64 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: u64 = 60 * MILLIS_PER_MINUTE;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("malformed timestamp \"{text}\"")]
    Malformed { text: String },
}

impl ParseError {
    fn malformed(text: &str) -> Self {
        ParseError::Malformed {
            text: text.to_owned(),
        }
    }
}

/// Whether the timestamp field of a chapter currently holds parseable text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TimestampState {
    #[default]
    Valid,
    Invalid(String),
}

impl TimestampState {
    pub fn is_valid(&self) -> bool {
        matches!(self, TimestampState::Valid)
    }
}

/// Parses user text into a start time.
///
/// Accepts `HH:MM:SS` with an optional 1-3 digit fraction (`HH` is two or more
/// digits), or a bare digit string taken as milliseconds. Values must fit the
/// 32-bit millisecond offsets the audio-tag side stores.
pub fn parse_timestamp(text: &str) -> Result<Duration, ParseError> {
    let trimmed = text.trim();
    if trimmed == LEGACY_ZERO {
        return Ok(Duration::ZERO);
    }

    let millis = if let Some(caps) = CANONICAL_RE.captures(trimmed) {
        let hours = caps[1].parse::<u64>().map_err(|_| ParseError::malformed(text))?;
        let minutes = caps[2].parse::<u64>().map_err(|_| ParseError::malformed(text))?;
        let seconds = caps[3].parse::<u64>().map_err(|_| ParseError::malformed(text))?;
        if minutes > 59 || seconds > 59 {
            log::debug!("timestamp component out of range: {trimmed}");
            return Err(ParseError::malformed(text));
        }
        let fraction = caps.get(4).map_or(0, |m| fraction_to_millis(m.as_str()));

        hours
            .checked_mul(MILLIS_PER_HOUR)
            .and_then(|h| h.checked_add(minutes * MILLIS_PER_MINUTE))
            .and_then(|t| t.checked_add(seconds * MILLIS_PER_SECOND))
            .and_then(|t| t.checked_add(fraction))
            .ok_or_else(|| ParseError::malformed(text))?
    } else if MILLIS_RE.is_match(trimmed) {
        trimmed
            .parse::<u64>()
            .map_err(|_| ParseError::malformed(text))?
    } else {
        log::debug!("timestamp does not match any accepted form: {trimmed:?}");
        return Err(ParseError::malformed(text));
    };

    if millis > u64::from(u32::MAX) {
        log::debug!("timestamp exceeds 32-bit millisecond range: {trimmed}");
        return Err(ParseError::malformed(text));
    }

    Ok(Duration::from_millis(millis))
}

// "5" is half a second, "05" fifty millis, "005" five millis.
fn fraction_to_millis(digits: &str) -> u64 {
    let value: u64 = digits
        .bytes()
        .fold(0, |acc, b| acc * 10 + u64::from(b - b'0'));
    match digits.len() {
        1 => value * 100,
        2 => value * 10,
        _ => value,
    }
}

/// Formats a start time as `HH:MM:SS.fff`. Hours are never wrapped into days.
pub fn format_timestamp(duration: Duration) -> String {
    let millis = duration.as_millis();
    let hours = millis / u128::from(MILLIS_PER_HOUR);
    let minutes = (millis / u128::from(MILLIS_PER_MINUTE)) % 60;
    let seconds = (millis / u128::from(MILLIS_PER_SECOND)) % 60;
    let fraction = millis % u128::from(MILLIS_PER_SECOND);
    format!("{hours:02}:{minutes:02}:{seconds:02}.{fraction:03}")
}
