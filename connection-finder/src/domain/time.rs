//! Schedule time handling.
//!
//! Timetables give stop times as "HH:MM:SS" strings relative to the start of
//! the service day. Trips that run past midnight keep counting hours, so
//! "25:10:00" is ten past one the next morning but still belongs to the
//! previous service day. This module keeps times in that textual form.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A time of the service day in canonical zero-padded "HH:MM:SS" form.
///
/// The hour may exceed 23 for trips belonging to the previous service day.
/// Ordering is the lexicographic ordering of the canonical text, which is
/// only correct because every value has the same width.
///
/// # Examples
///
/// ```
/// use connection_finder::domain::ScheduleTime;
///
/// let late = ScheduleTime::parse("23:50:00").unwrap();
/// let overnight = ScheduleTime::parse("24:10:00").unwrap();
/// assert!(late < overnight);
///
/// // A one-digit hour is padded
/// assert_eq!(ScheduleTime::parse("8:05:00").unwrap().as_str(), "08:05:00");
///
/// // Minutes and seconds must be in range
/// assert!(ScheduleTime::parse("08:60:00").is_err());
/// assert!(ScheduleTime::parse("0805").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScheduleTime(String);

impl ScheduleTime {
    /// Start of the service day.
    pub fn start_of_day() -> Self {
        Self("00:00:00".to_string())
    }

    /// Last second of the day after the service day, covering every
    /// overnight trip.
    pub fn end_of_next_day() -> Self {
        Self("47:59:59".to_string())
    }

    /// Parse a time from "HH:MM:SS" (or "H:MM:SS") format.
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        let (hour, rest) = s
            .split_once(':')
            .ok_or_else(|| TimeError::new("expected HH:MM:SS format"))?;

        let hour = match hour.len() {
            1 | 2 => hour
                .bytes()
                .try_fold(0u32, |acc, b| {
                    (b as char).to_digit(10).map(|d| acc * 10 + d)
                })
                .ok_or_else(|| TimeError::new("invalid hour digits"))?,
            _ => return Err(TimeError::new("hour must have one or two digits")),
        };

        let rest = rest.as_bytes();
        if rest.len() != 5 || rest[2] != b':' {
            return Err(TimeError::new("expected MM:SS after the hour"));
        }

        let minute =
            parse_two_digits(&rest[0..2]).ok_or_else(|| TimeError::new("invalid minute digits"))?;
        let second =
            parse_two_digits(&rest[3..5]).ok_or_else(|| TimeError::new("invalid second digits"))?;

        Self::from_hms(hour, minute, second)
    }

    /// Build a time from components.
    ///
    /// Hours go up to 99 so the text keeps its fixed width; minutes and
    /// seconds must be 0-59.
    pub fn from_hms(hour: u32, minute: u32, second: u32) -> Result<Self, TimeError> {
        if hour > 99 {
            return Err(TimeError::new("hour must be 0-99"));
        }
        if minute > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }
        if second > 59 {
            return Err(TimeError::new("second must be 0-59"));
        }
        Ok(Self(format!("{hour:02}:{minute:02}:{second:02}")))
    }

    /// Returns the canonical text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Seconds since the start of the service day.
    pub fn seconds(&self) -> u32 {
        let b = self.0.as_bytes();
        let hour = parse_two_digits(&b[0..2]).unwrap_or(0);
        let minute = parse_two_digits(&b[3..5]).unwrap_or(0);
        let second = parse_two_digits(&b[6..8]).unwrap_or(0);
        hour * 3600 + minute * 60 + second
    }
}

impl fmt::Debug for ScheduleTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScheduleTime({})", self.0)
    }
}

impl fmt::Display for ScheduleTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for ScheduleTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ScheduleTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        ScheduleTime::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Parse two ASCII digit bytes into a u32.
fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)?;
    let d2 = (bytes[1] as char).to_digit(10)?;
    Some(d1 * 10 + d2)
}
