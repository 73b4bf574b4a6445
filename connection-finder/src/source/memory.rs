//! Indexed in-memory schedule.

use std::collections::{BTreeSet, HashMap};

use super::error::SourceError;
use super::snapshot::ScheduleSnapshot;
use super::ScheduleSource;
use crate::domain::{
    Agency, AgencyId, Calendar, CalendarException, Route, RouteId, ServiceDate, ServiceId, Stop,
    StopId, StopTime, Transfer, Trip, TripId,
};

/// A schedule snapshot held in memory, indexed for the lookups the query
/// engine performs.
///
/// Immutable once built, so it can be shared between concurrent queries
/// behind an `Arc`.
#[derive(Debug, Default)]
pub struct InMemorySchedule {
    stops: HashMap<StopId, Stop>,
    /// parent id -> child stop ids
    children: HashMap<StopId, Vec<StopId>>,
    transfers: Vec<Transfer>,
    /// stop id -> indices into `transfers`
    transfers_by_stop: HashMap<StopId, Vec<usize>>,
    stop_times_by_stop: HashMap<StopId, Vec<StopTime>>,
    /// trip id -> stop times ordered by sequence
    stop_times_by_trip: HashMap<TripId, Vec<StopTime>>,
    trips: HashMap<TripId, Trip>,
    routes: HashMap<RouteId, Route>,
    agencies: HashMap<AgencyId, Agency>,
    calendars: Vec<Calendar>,
    exceptions_by_date: HashMap<ServiceDate, Vec<CalendarException>>,
    exceptions_by_service: HashMap<ServiceId, Vec<CalendarException>>,
}

impl InMemorySchedule {
    /// Build the indexes from a snapshot.
    pub fn from_snapshot(snapshot: ScheduleSnapshot) -> Self {
        let mut children: HashMap<StopId, Vec<StopId>> = HashMap::new();
        for stop in &snapshot.stops {
            if let Some(parent) = &stop.parent_id {
                children.entry(parent.clone()).or_default().push(stop.id.clone());
            }
        }

        let mut transfers_by_stop: HashMap<StopId, Vec<usize>> = HashMap::new();
        for (idx, transfer) in snapshot.transfers.iter().enumerate() {
            transfers_by_stop
                .entry(transfer.from_id.clone())
                .or_default()
                .push(idx);
            if transfer.to_id != transfer.from_id {
                transfers_by_stop
                    .entry(transfer.to_id.clone())
                    .or_default()
                    .push(idx);
            }
        }

        let mut stop_times_by_stop: HashMap<StopId, Vec<StopTime>> = HashMap::new();
        let mut stop_times_by_trip: HashMap<TripId, Vec<StopTime>> = HashMap::new();
        for stop_time in snapshot.stop_times {
            stop_times_by_stop
                .entry(stop_time.stop_id.clone())
                .or_default()
                .push(stop_time.clone());
            stop_times_by_trip
                .entry(stop_time.trip_id.clone())
                .or_default()
                .push(stop_time);
        }
        for stop_times in stop_times_by_trip.values_mut() {
            stop_times.sort_by_key(|st| st.sequence);
        }

        let mut exceptions_by_date: HashMap<ServiceDate, Vec<CalendarException>> = HashMap::new();
        let mut exceptions_by_service: HashMap<ServiceId, Vec<CalendarException>> = HashMap::new();
        for exception in snapshot.calendar_exceptions {
            exceptions_by_date
                .entry(exception.date)
                .or_default()
                .push(exception.clone());
            exceptions_by_service
                .entry(exception.service_id.clone())
                .or_default()
                .push(exception);
        }

        Self {
            stops: snapshot
                .stops
                .into_iter()
                .map(|s| (s.id.clone(), s))
                .collect(),
            children,
            transfers: snapshot.transfers,
            transfers_by_stop,
            stop_times_by_stop,
            stop_times_by_trip,
            trips: snapshot
                .trips
                .into_iter()
                .map(|t| (t.id.clone(), t))
                .collect(),
            routes: snapshot
                .routes
                .into_iter()
                .map(|r| (r.id.clone(), r))
                .collect(),
            agencies: snapshot
                .agencies
                .into_iter()
                .map(|a| (a.id.clone(), a))
                .collect(),
            calendars: snapshot.calendars,
            exceptions_by_date,
            exceptions_by_service,
        }
    }

    /// Number of stops.
    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    /// Number of trips.
    pub fn trip_count(&self) -> usize {
        self.trips.len()
    }

    /// Number of calendar rows.
    pub fn calendar_count(&self) -> usize {
        self.calendars.len()
    }
}

impl From<ScheduleSnapshot> for InMemorySchedule {
    fn from(snapshot: ScheduleSnapshot) -> Self {
        Self::from_snapshot(snapshot)
    }
}

/// Look up each id in a map, skipping unknown ids.
fn collect_by_ids<K, V>(map: &HashMap<K, V>, ids: &BTreeSet<K>) -> Vec<V>
where
    K: std::hash::Hash + Eq,
    V: Clone,
{
    ids.iter().filter_map(|id| map.get(id)).cloned().collect()
}

impl ScheduleSource for InMemorySchedule {
    fn stops_by_ids(&self, ids: &BTreeSet<StopId>) -> Result<Vec<Stop>, SourceError> {
        Ok(collect_by_ids(&self.stops, ids))
    }

    fn stops_within(&self, ids: &BTreeSet<StopId>) -> Result<Vec<Stop>, SourceError> {
        let mut found: BTreeSet<&StopId> = BTreeSet::new();
        for id in ids {
            if self.stops.contains_key(id) {
                found.insert(id);
            }
            if let Some(children) = self.children.get(id) {
                found.extend(children.iter());
            }
        }
        Ok(found
            .into_iter()
            .filter_map(|id| self.stops.get(id))
            .cloned()
            .collect())
    }

    fn transfers_touching(&self, ids: &BTreeSet<StopId>) -> Result<Vec<Transfer>, SourceError> {
        let indices: BTreeSet<usize> = ids
            .iter()
            .filter_map(|id| self.transfers_by_stop.get(id))
            .flatten()
            .copied()
            .collect();
        Ok(indices
            .into_iter()
            .map(|idx| self.transfers[idx].clone())
            .collect())
    }

    fn stop_times_for_stops(&self, ids: &BTreeSet<StopId>) -> Result<Vec<StopTime>, SourceError> {
        Ok(ids
            .iter()
            .filter_map(|id| self.stop_times_by_stop.get(id))
            .flatten()
            .cloned()
            .collect())
    }

    fn stop_times_for_trip(&self, trip: &TripId) -> Result<Vec<StopTime>, SourceError> {
        Ok(self.stop_times_by_trip.get(trip).cloned().unwrap_or_default())
    }

    fn trips_by_ids(&self, ids: &BTreeSet<TripId>) -> Result<Vec<Trip>, SourceError> {
        Ok(collect_by_ids(&self.trips, ids))
    }

    fn routes_by_ids(&self, ids: &BTreeSet<RouteId>) -> Result<Vec<Route>, SourceError> {
        Ok(collect_by_ids(&self.routes, ids))
    }

    fn agencies_by_ids(&self, ids: &BTreeSet<AgencyId>) -> Result<Vec<Agency>, SourceError> {
        Ok(collect_by_ids(&self.agencies, ids))
    }

    fn calendars(&self) -> Result<Vec<Calendar>, SourceError> {
        Ok(self.calendars.clone())
    }

    fn calendar_exceptions(
        &self,
        date: ServiceDate,
    ) -> Result<Vec<CalendarException>, SourceError> {
        Ok(self
            .exceptions_by_date
            .get(&date)
            .cloned()
            .unwrap_or_default())
    }

    fn exceptions_for_service(
        &self,
        service: &ServiceId,
    ) -> Result<Vec<CalendarException>, SourceError> {
        Ok(self
            .exceptions_by_service
            .get(service)
            .cloned()
            .unwrap_or_default())
    }
}
