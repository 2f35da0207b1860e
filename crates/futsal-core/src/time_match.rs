//! Time-of-day parsing and slot classification against a requested time.
//!
//! Provider slot times arrive as `HH:MM`, `HH:MM:SS`, or a full
//! `YYYY-MM-DD HH:MM:SS` timestamp. Only the time of day is compared and
//! seconds are always dropped.

use chrono::{NaiveTime, Timelike};
use thiserror::Error;

use crate::types::MatchKind;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid time of day \"{input}\"")]
pub struct TimeParseError {
    pub input: String,
}

/// Strips a leading date component (`YYYY-MM-DD ` or `YYYY-MM-DDT`), if any.
fn time_part(raw: &str) -> &str {
    let raw = raw.trim();
    raw.rsplit([' ', 'T']).next().unwrap_or(raw)
}

/// Parses a time of day, truncating seconds.
///
/// # Errors
///
/// Returns [`TimeParseError`] when the input is not `HH:MM` or `HH:MM:SS`
/// (optionally preceded by a date).
pub fn parse_time_of_day(raw: &str) -> Result<NaiveTime, TimeParseError> {
    let part = time_part(raw);
    NaiveTime::parse_from_str(part, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(part, "%H:%M"))
        .ok()
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .ok_or_else(|| TimeParseError {
            input: raw.to_string(),
        })
}

/// Renders a provider time as `HH:MM`.
///
/// Values chrono refuses (e.g. the `24:00` some providers use for a
/// midnight end) are kept as-is minus any seconds.
#[must_use]
pub fn format_hhmm(raw: &str) -> String {
    if let Ok(t) = parse_time_of_day(raw) {
        return t.format("%H:%M").to_string();
    }
    let part = time_part(raw);
    match part.match_indices(':').nth(1) {
        Some((idx, _)) => part[..idx].to_string(),
        None => part.to_string(),
    }
}

/// `"HH:MM - HH:MM"` label for a slot.
#[must_use]
pub fn time_range_label(start: &str, end: &str) -> String {
    format!("{} - {}", format_hhmm(start), format_hhmm(end))
}

fn minute_of_day(t: NaiveTime) -> i64 {
    i64::from(t.hour()) * 60 + i64::from(t.minute())
}

/// Classifies a slot start time against the requested time.
///
/// - no target: [`MatchKind::Any`]
/// - unparsable candidate: [`MatchKind::None`]
/// - zero minutes apart: [`MatchKind::Exact`]
/// - within `tolerance_minutes` (inclusive): [`MatchKind::Nearby`]
#[must_use]
pub fn classify(target: Option<NaiveTime>, candidate: &str, tolerance_minutes: u32) -> MatchKind {
    let Some(target) = target else {
        return MatchKind::Any;
    };
    // Malformed slot times are expected input noise, not failures.
    let Ok(candidate) = parse_time_of_day(candidate) else {
        return MatchKind::None;
    };

    let diff = (minute_of_day(target) - minute_of_day(candidate)).abs();
    if diff == 0 {
        MatchKind::Exact
    } else if diff <= i64::from(tolerance_minutes) {
        MatchKind::Nearby
    } else {
        MatchKind::None
    }
}
