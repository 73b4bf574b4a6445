//! Read-only access to a schedule snapshot.
//!
//! The algorithms never touch storage directly. They go through the
//! [`ScheduleSource`] trait, which a relational store, a flat-file reader or
//! the bundled [`InMemorySchedule`] can implement.

mod error;
mod memory;
mod snapshot;

use std::collections::BTreeSet;

pub use error::{SnapshotError, SourceError};
pub use memory::InMemorySchedule;
pub use snapshot::ScheduleSnapshot;

use crate::domain::{
    Agency, AgencyId, Calendar, CalendarException, Route, RouteId, ServiceDate, ServiceId, Stop,
    StopId, StopTime, Transfer, Trip, TripId,
};

/// Trait for reading schedule tables.
///
/// Implementations must behave as an immutable snapshot for the duration of
/// a query. Lookups by id silently skip unknown ids.
pub trait ScheduleSource: Send + Sync {
    /// Stops whose id is in `ids`.
    fn stops_by_ids(&self, ids: &BTreeSet<StopId>) -> Result<Vec<Stop>, SourceError>;

    /// Stops whose own id or whose parent id is in `ids`.
    fn stops_within(&self, ids: &BTreeSet<StopId>) -> Result<Vec<Stop>, SourceError>;

    /// Transfers whose `from_id` or `to_id` is in `ids`.
    fn transfers_touching(&self, ids: &BTreeSet<StopId>) -> Result<Vec<Transfer>, SourceError>;

    /// Stop times at any of the given stops.
    fn stop_times_for_stops(&self, ids: &BTreeSet<StopId>) -> Result<Vec<StopTime>, SourceError>;

    /// All stop times of one trip, ordered by sequence.
    fn stop_times_for_trip(&self, trip: &TripId) -> Result<Vec<StopTime>, SourceError>;

    fn trips_by_ids(&self, ids: &BTreeSet<TripId>) -> Result<Vec<Trip>, SourceError>;

    fn routes_by_ids(&self, ids: &BTreeSet<RouteId>) -> Result<Vec<Route>, SourceError>;

    fn agencies_by_ids(&self, ids: &BTreeSet<AgencyId>) -> Result<Vec<Agency>, SourceError>;

    /// Every calendar row.
    fn calendars(&self) -> Result<Vec<Calendar>, SourceError>;

    /// Exceptions of both types for one date.
    fn calendar_exceptions(&self, date: ServiceDate)
    -> Result<Vec<CalendarException>, SourceError>;

    /// Every exception of one service, any date.
    fn exceptions_for_service(
        &self,
        service: &ServiceId,
    ) -> Result<Vec<CalendarException>, SourceError>;
}
