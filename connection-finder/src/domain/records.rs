//! Rows of the schedule tables.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::{AgencyId, RouteId, ScheduleTime, ServiceDate, ServiceId, StopId, TripId};

/// A stop, platform or station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stop {
    pub id: StopId,
    pub name: String,
    /// The station this stop belongs to, if any.
    #[serde(default)]
    pub parent_id: Option<StopId>,
}

impl Stop {
    pub fn new(id: impl Into<StopId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parent_id: None,
        }
    }

    /// Set the parent station.
    pub fn with_parent(mut self, parent: impl Into<StopId>) -> Self {
        self.parent_id = Some(parent.into());
        self
    }
}

/// A directed interchange edge between two stops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub from_id: StopId,
    pub to_id: StopId,
    /// Minimum transfer time in seconds.
    #[serde(default)]
    pub min_transfer_time: Option<u32>,
}

impl Transfer {
    /// The stop at the other end of this transfer, if `stop` is one of its ends.
    pub fn opposite(&self, stop: &StopId) -> Option<&StopId> {
        if &self.from_id == stop {
            Some(&self.to_id)
        } else if &self.to_id == stop {
            Some(&self.from_id)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub id: RouteId,
    pub short_name: String,
    pub agency_id: AgencyId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agency {
    pub id: AgencyId,
    pub name: String,
}

/// A single scheduled vehicle run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    pub id: TripId,
    pub route_id: RouteId,
    pub service_id: ServiceId,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub headsign: Option<String>,
}

/// One visit of a trip at a stop.
///
/// `sequence` is strictly increasing within a trip and defines travel order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopTime {
    pub trip_id: TripId,
    pub stop_id: StopId,
    pub arrival_time: ScheduleTime,
    pub departure_time: ScheduleTime,
    pub sequence: u32,
}

/// Weekly recurrence of a service over an inclusive date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calendar {
    pub service_id: ServiceId,
    pub start_date: ServiceDate,
    pub end_date: ServiceDate,
    pub monday: bool,
    pub tuesday: bool,
    pub wednesday: bool,
    pub thursday: bool,
    pub friday: bool,
    pub saturday: bool,
    pub sunday: bool,
}

impl Calendar {
    /// A calendar running on the given weekdays between two dates.
    pub fn new(
        service_id: impl Into<ServiceId>,
        start_date: ServiceDate,
        end_date: ServiceDate,
        days: &[Weekday],
    ) -> Self {
        let has = |day: Weekday| days.contains(&day);
        Self {
            service_id: service_id.into(),
            start_date,
            end_date,
            monday: has(Weekday::Mon),
            tuesday: has(Weekday::Tue),
            wednesday: has(Weekday::Wed),
            thursday: has(Weekday::Thu),
            friday: has(Weekday::Fri),
            saturday: has(Weekday::Sat),
            sunday: has(Weekday::Sun),
        }
    }

    /// Whether the weekday flag for `day` is set.
    pub fn runs_on(&self, day: Weekday) -> bool {
        match day {
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
            Weekday::Sun => self.sunday,
        }
    }

    /// Whether `date` lies within the inclusive date range.
    pub fn covers(&self, date: ServiceDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Weekdays on which the service runs, Monday first.
    pub fn days(&self) -> Vec<Weekday> {
        [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ]
        .into_iter()
        .filter(|day| self.runs_on(*day))
        .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExceptionType {
    /// Service runs on this date regardless of its calendar.
    Added,
    /// Service does not run on this date regardless of its calendar.
    Removed,
}

/// A per-date override of a service's weekly pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarException {
    pub service_id: ServiceId,
    pub date: ServiceDate,
    pub exception_type: ExceptionType,
}

impl CalendarException {
    pub fn added(service_id: impl Into<ServiceId>, date: ServiceDate) -> Self {
        Self {
            service_id: service_id.into(),
            date,
            exception_type: ExceptionType::Added,
        }
    }

    pub fn removed(service_id: impl Into<ServiceId>, date: ServiceDate) -> Self {
        Self {
            service_id: service_id.into(),
            date,
            exception_type: ExceptionType::Removed,
        }
    }
}
