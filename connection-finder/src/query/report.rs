//! Full schedule of one trip, for diagnostics.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::calendar::{DateRange, compress_service_dates};
use crate::domain::{
    Agency, Calendar, ExceptionType, Route, ScheduleTime, StopId, Trip, TripId,
};
use crate::source::{ScheduleSource, SourceError};

/// One stop visit in a trip report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportCall {
    pub sequence: u32,
    pub stop_id: StopId,
    /// `None` when the stop is missing from the stops table.
    pub stop_name: Option<String>,
    pub arrival_time: ScheduleTime,
    pub departure_time: ScheduleTime,
}

/// A trip with its route, agency, calls and when it runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripReport {
    pub trip: Trip,
    pub route: Option<Route>,
    pub agency: Option<Agency>,
    pub calls: Vec<ReportCall>,
    /// Weekly pattern of the trip's service, if it has one.
    pub calendar: Option<Calendar>,
    /// Dates the service is added on, merged into ranges.
    pub added: Vec<DateRange>,
    /// Dates the service is removed on, merged into ranges.
    pub removed: Vec<DateRange>,
}

/// Build the report for `trip_id`, or `None` if the trip does not exist.
pub fn trip_report<S: ScheduleSource + ?Sized>(
    source: &S,
    trip_id: &TripId,
) -> Result<Option<TripReport>, SourceError> {
    let Some(trip) = source
        .trips_by_ids(&BTreeSet::from([trip_id.clone()]))?
        .into_iter()
        .next()
    else {
        return Ok(None);
    };

    let route = source
        .routes_by_ids(&BTreeSet::from([trip.route_id.clone()]))?
        .into_iter()
        .next();
    let agency = match &route {
        Some(route) => source
            .agencies_by_ids(&BTreeSet::from([route.agency_id.clone()]))?
            .into_iter()
            .next(),
        None => None,
    };

    let stop_times = source.stop_times_for_trip(trip_id)?;
    let stop_ids: BTreeSet<StopId> = stop_times.iter().map(|st| st.stop_id.clone()).collect();
    let names: HashMap<StopId, String> = source
        .stops_by_ids(&stop_ids)?
        .into_iter()
        .map(|s| (s.id, s.name))
        .collect();
    let calls = stop_times
        .into_iter()
        .map(|st| ReportCall {
            sequence: st.sequence,
            stop_name: names.get(&st.stop_id).cloned(),
            stop_id: st.stop_id,
            arrival_time: st.arrival_time,
            departure_time: st.departure_time,
        })
        .collect();

    let calendar = source
        .calendars()?
        .into_iter()
        .find(|c| c.service_id == trip.service_id);

    let exceptions = source.exceptions_for_service(&trip.service_id)?;
    let dates_of = |kind: ExceptionType| {
        compress_service_dates(
            exceptions
                .iter()
                .filter(|e| e.exception_type == kind)
                .map(|e| e.date),
        )
    };
    let added = dates_of(ExceptionType::Added);
    let removed = dates_of(ExceptionType::Removed);

    Ok(Some(TripReport {
        trip,
        route,
        agency,
        calls,
        calendar,
        added,
        removed,
    }))
}

fn join_ranges(ranges: &[DateRange]) -> String {
    if ranges.is_empty() {
        return "-".to_string();
    }
    ranges
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for TripReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let route = self
            .route
            .as_ref()
            .map(|r| r.short_name.as_str())
            .unwrap_or("?");
        let agency = self
            .agency
            .as_ref()
            .map(|a| a.name.as_str())
            .unwrap_or("?");
        write!(f, "Trip {} ({route}, {agency})", self.trip.id)?;
        if let Some(name) = &self.trip.short_name {
            write!(f, " {name}")?;
        }
        if let Some(headsign) = &self.trip.headsign {
            write!(f, " to {headsign}")?;
        }
        writeln!(f)?;

        write!(f, "  service {}", self.trip.service_id)?;
        if let Some(cal) = &self.calendar {
            let days: Vec<String> = cal.days().iter().map(|d| d.to_string()).collect();
            write!(
                f,
                ": {}..{} on {}",
                cal.start_date,
                cal.end_date,
                if days.is_empty() {
                    "no weekdays".to_string()
                } else {
                    days.join(" ")
                }
            )?;
        }
        writeln!(f)?;
        writeln!(f, "  added: {}", join_ranges(&self.added))?;
        writeln!(f, "  removed: {}", join_ranges(&self.removed))?;

        for call in &self.calls {
            writeln!(
                f,
                "  {:>3} {} {} {}",
                call.sequence,
                call.arrival_time,
                call.departure_time,
                call.stop_name.as_deref().unwrap_or(call.stop_id.as_str())
            )?;
        }
        Ok(())
    }
}
