//! Calendar dates of the service day.
//!
//! Schedule tables carry dates as integers in `YYYYMMDD` form. `ServiceDate`
//! wraps a proleptic Gregorian `NaiveDate` (no time zone is involved, so the
//! weekday of a date never depends on where the code runs) and converts to
//! and from the numeric form.

use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Error for malformed date input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    /// The value does not denote a real calendar date (e.g. month 13).
    #[error("invalid date {value}: {reason}")]
    InvalidDate { value: String, reason: &'static str },
}

impl DateError {
    fn invalid(value: impl fmt::Display, reason: &'static str) -> Self {
        DateError::InvalidDate {
            value: value.to_string(),
            reason,
        }
    }
}

/// A calendar date in the range 0001-01-01 to 9999-12-31.
///
/// # Examples
///
/// ```
/// use connection_finder::domain::ServiceDate;
/// use chrono::Weekday;
///
/// let date = ServiceDate::decode(20250830).unwrap();
/// assert_eq!(date.weekday(), Weekday::Sat);
/// assert_eq!(date.encode(), 20250830);
///
/// // Malformed values fail instead of rolling over
/// assert!(ServiceDate::decode(20251301).is_err());
/// assert!(ServiceDate::decode(20250230).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceDate(NaiveDate);

impl ServiceDate {
    /// Create a date from year, month (1-based) and day.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        let label = format!("{year:04}-{month:02}-{day:02}");
        if !(1..=9999).contains(&year) {
            return Err(DateError::invalid(label, "year must be 1-9999"));
        }
        if !(1..=12).contains(&month) {
            return Err(DateError::invalid(label, "month must be 1-12"));
        }
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| DateError::invalid(label, "day out of range for month"))
    }

    /// Decode the numeric `YYYYMMDD` form.
    pub fn decode(value: u32) -> Result<Self, DateError> {
        let year = (value / 10_000) as i32;
        let month = (value / 100) % 100;
        let day = value % 100;
        Self::from_ymd(year, month, day).map_err(|e| match e {
            DateError::InvalidDate { reason, .. } => DateError::invalid(value, reason),
        })
    }

    /// Encode as `YYYY * 10000 + MM * 100 + DD`.
    pub fn encode(&self) -> u32 {
        self.0.year() as u32 * 10_000 + self.0.month() * 100 + self.0.day()
    }

    /// Parse either `YYYYMMDD` or `YYYY-MM-DD`.
    pub fn parse(s: &str) -> Result<Self, DateError> {
        let digits: String = s.chars().filter(|c| *c != '-').collect();
        let dashed = s.len() == 10 && s.as_bytes()[4] == b'-' && s.as_bytes()[7] == b'-';
        if digits.len() != 8 || (s.len() != 8 && !dashed) {
            return Err(DateError::invalid(s, "expected YYYYMMDD or YYYY-MM-DD"));
        }
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DateError::invalid(s, "expected digits"));
        }
        let value: u32 = digits
            .parse()
            .map_err(|_| DateError::invalid(s, "expected digits"))?;
        Self::decode(value)
    }

    /// Returns the underlying chrono date.
    pub fn naive(&self) -> NaiveDate {
        self.0
    }

    /// Day of the week.
    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    /// The following calendar day, or `None` past 9999-12-31.
    pub fn next_day(&self) -> Option<Self> {
        self.0
            .succ_opt()
            .filter(|d| d.year() <= 9999)
            .map(Self)
    }

    /// Whether both dates are the same calendar day.
    pub fn is_same_day(&self, other: &Self) -> bool {
        self.0 == other.0
    }

    /// Whether `other` is the calendar day directly after `self`.
    pub fn is_next_day(&self, other: &Self) -> bool {
        self.next_day().is_some_and(|next| next.is_same_day(other))
    }
}

impl TryFrom<NaiveDate> for ServiceDate {
    type Error = DateError;

    fn try_from(date: NaiveDate) -> Result<Self, Self::Error> {
        Self::from_ymd(date.year(), date.month(), date.day())
    }
}

impl fmt::Debug for ServiceDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ServiceDate({})", self.encode())
    }
}

impl fmt::Display for ServiceDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encode())
    }
}

impl Serialize for ServiceDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.encode())
    }
}

impl<'de> Deserialize<'de> for ServiceDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = u32::deserialize(deserializer)?;
        ServiceDate::decode(value).map_err(serde::de::Error::custom)
    }
}

/// Weekday of a date.
pub fn weekday_of(date: ServiceDate) -> Weekday {
    date.weekday()
}

/// Encode a date to its numeric form.
pub fn encode_date(date: ServiceDate) -> u32 {
    date.encode()
}

/// Decode a numeric date, failing on malformed values.
pub fn decode_date(value: u32) -> Result<ServiceDate, DateError> {
    ServiceDate::decode(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(value: u32) -> ServiceDate {
        ServiceDate::decode(value).unwrap()
    }

    #[test]
    fn weekdays() {
        assert_eq!(weekday_of(d(20250829)), Weekday::Fri);
        assert_eq!(weekday_of(d(20250830)), Weekday::Sat);
        assert_eq!(weekday_of(d(20250831)), Weekday::Sun);
        assert_eq!(weekday_of(d(20000229)), Weekday::Tue);
    }

    #[test]
    fn encode_decode() {
        let date = ServiceDate::from_ymd(2025, 1, 5).unwrap();
        assert_eq!(encode_date(date), 20250105);
        assert_eq!(decode_date(20250105).unwrap(), date);
    }

    #[test]
    fn reject_malformed() {
        assert!(ServiceDate::decode(20251301).is_err());
        assert!(ServiceDate::decode(20250001).is_err());
        assert!(ServiceDate::decode(20250132).is_err());
        assert!(ServiceDate::decode(20250229).is_err());
        assert!(ServiceDate::decode(20250100).is_err());
        assert!(ServiceDate::decode(101).is_err());
        assert!(ServiceDate::decode(20240229).is_ok());
    }

    #[test]
    fn error_display() {
        let err = ServiceDate::decode(20251301).unwrap_err();
        assert_eq!(err.to_string(), "invalid date 20251301: month must be 1-12");

        let err = ServiceDate::decode(20250230).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid date 20250230: day out of range for month"
        );
    }

    #[test]
    fn next_day_crosses_boundaries() {
        assert_eq!(d(20250131).next_day(), Some(d(20250201)));
        assert_eq!(d(20241231).next_day(), Some(d(20250101)));
        assert_eq!(d(20240228).next_day(), Some(d(20240229)));
        assert_eq!(d(99991231).next_day(), None);
    }

    #[test]
    fn same_and_next_day() {
        assert!(d(20250101).is_same_day(&d(20250101)));
        assert!(!d(20250101).is_same_day(&d(20250102)));
        assert!(d(20250131).is_next_day(&d(20250201)));
        assert!(!d(20250201).is_next_day(&d(20250131)));
        assert!(!d(20250101).is_next_day(&d(20250103)));
    }

    #[test]
    fn parse_both_forms() {
        assert_eq!(ServiceDate::parse("20250829").unwrap(), d(20250829));
        assert_eq!(ServiceDate::parse("2025-08-29").unwrap(), d(20250829));
        assert!(ServiceDate::parse("2025/08/29").is_err());
        assert!(ServiceDate::parse("202508").is_err());
        assert!(ServiceDate::parse("2025-13-01").is_err());
        assert!(ServiceDate::parse("20-2508-29").is_err());
    }

    #[test]
    fn serde_numeric_form() {
        assert_eq!(serde_json::to_string(&d(20250829)).unwrap(), "20250829");
        let back: ServiceDate = serde_json::from_str("20250829").unwrap();
        assert_eq!(back, d(20250829));
        assert!(serde_json::from_str::<ServiceDate>("20251340").is_err());
    }
}
