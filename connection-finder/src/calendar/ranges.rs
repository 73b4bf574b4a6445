//! Compressing date sets into display ranges.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::domain::{DateError, ServiceDate};

/// A single date or an inclusive run of consecutive dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DateRange {
    Single(ServiceDate),
    Span { start: ServiceDate, end: ServiceDate },
}

impl DateRange {
    fn closed(start: ServiceDate, end: ServiceDate) -> Self {
        if start == end {
            DateRange::Single(start)
        } else {
            DateRange::Span { start, end }
        }
    }

    /// First date of the range.
    pub fn start(&self) -> ServiceDate {
        match self {
            DateRange::Single(date) => *date,
            DateRange::Span { start, .. } => *start,
        }
    }

    /// Last date of the range.
    pub fn end(&self) -> ServiceDate {
        match self {
            DateRange::Single(date) => *date,
            DateRange::Span { end, .. } => *end,
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateRange::Single(date) => write!(f, "{date}"),
            DateRange::Span { start, end } => write!(f, "{start}..{end}"),
        }
    }
}

/// Merge numeric `YYYYMMDD` dates into runs of consecutive calendar days.
///
/// Adjacency is decided on decoded dates, so runs continue across month
/// and year ends. Duplicates collapse. Fails on the first malformed value.
///
/// # Examples
///
/// ```
/// use connection_finder::calendar::compress_dates;
///
/// let ranges = compress_dates([20250101, 20250102, 20250103, 20250105]).unwrap();
/// let shown: Vec<String> = ranges.iter().map(|r| r.to_string()).collect();
/// assert_eq!(shown, vec!["20250101..20250103", "20250105"]);
///
/// assert!(compress_dates([]).unwrap().is_empty());
/// ```
pub fn compress_dates(
    dates: impl IntoIterator<Item = u32>,
) -> Result<Vec<DateRange>, DateError> {
    let sorted = dates
        .into_iter()
        .map(ServiceDate::decode)
        .collect::<Result<BTreeSet<_>, _>>()?;
    Ok(compress_service_dates(sorted))
}

/// Merge already-decoded dates into ranges.
pub fn compress_service_dates(dates: impl IntoIterator<Item = ServiceDate>) -> Vec<DateRange> {
    let sorted: BTreeSet<ServiceDate> = dates.into_iter().collect();
    let mut ranges = Vec::new();
    let mut iter = sorted.into_iter();

    let Some(first) = iter.next() else {
        return ranges;
    };
    let mut start = first;
    let mut previous = first;

    for date in iter {
        if previous.is_next_day(&date) {
            previous = date;
        } else {
            ranges.push(DateRange::closed(start, previous));
            start = date;
            previous = date;
        }
    }
    ranges.push(DateRange::closed(start, previous));

    ranges
}
