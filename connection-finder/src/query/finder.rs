//! Time-windowed direct connection search.
//!
//! Answers "which trips run from the cluster around stop A to the cluster
//! around stop B on date D, leaving at or after `min_time` and arriving at
//! or before `max_time`". Only direct trips are considered, no changes.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::calendar::{ActiveServices, resolve_active_services};
use crate::cluster::{StopCluster, close_stops};
use crate::domain::{
    AgencyId, DateError, RouteId, ScheduleTime, ServiceDate, ServiceId, StopId, StopTime, TimeError,
    TripId,
};
use crate::source::{ScheduleSource, SourceError};

use super::config::QueryConfig;
use super::reporter::{QualityReporter, TracingReporter};

/// Error from a connection query.
#[derive(Debug, Clone, thiserror::Error)]
pub enum QueryError {
    /// Malformed date in the request
    #[error(transparent)]
    InvalidDate(#[from] DateError),

    /// Malformed time in the request
    #[error(transparent)]
    InvalidTime(#[from] TimeError),

    /// The schedule could not be read
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Request for direct connections between two anchor stops.
#[derive(Debug, Clone)]
pub struct ConnectionRequest {
    /// Stop the start cluster is built from.
    pub start: StopId,

    /// Stop the end cluster is built from.
    pub end: StopId,

    /// Service date.
    pub date: ServiceDate,

    /// Earliest departure from the start cluster (inclusive).
    pub min_time: ScheduleTime,

    /// Latest arrival at the end cluster (inclusive).
    pub max_time: ScheduleTime,
}

impl ConnectionRequest {
    /// Create a new request.
    pub fn new(
        start: StopId,
        end: StopId,
        date: ServiceDate,
        min_time: ScheduleTime,
        max_time: ScheduleTime,
    ) -> Self {
        Self {
            start,
            end,
            date,
            min_time,
            max_time,
        }
    }

    /// Build a request from raw values: a numeric `YYYYMMDD` date and
    /// "HH:MM:SS" times.
    pub fn parse(
        start: &str,
        end: &str,
        date: u32,
        min_time: &str,
        max_time: &str,
    ) -> Result<Self, QueryError> {
        Ok(Self {
            start: StopId::new(start),
            end: StopId::new(end),
            date: ServiceDate::decode(date)?,
            min_time: ScheduleTime::parse(min_time)?,
            max_time: ScheduleTime::parse(max_time)?,
        })
    }
}

/// One trip segment from a start-cluster stop to a later end-cluster stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionMatch {
    pub trip_id: TripId,
    pub trip_short_name: Option<String>,
    pub headsign: Option<String>,
    pub service_id: ServiceId,
    pub route_id: RouteId,
    pub route_short_name: String,
    pub agency_name: String,

    pub from_stop_id: StopId,
    pub from_stop_name: String,
    pub from_sequence: u32,
    pub departure_time: ScheduleTime,

    pub to_stop_id: StopId,
    pub to_stop_name: String,
    pub to_sequence: u32,
    pub arrival_time: ScheduleTime,
}

impl ConnectionMatch {
    /// Travel time in seconds.
    pub fn duration_secs(&self) -> u32 {
        self.arrival_time
            .seconds()
            .saturating_sub(self.departure_time.seconds())
    }
}

static DEFAULT_REPORTER: TracingReporter = TracingReporter;

/// Direct connection search over a schedule source.
pub struct ConnectionFinder<'a, S: ScheduleSource + ?Sized> {
    source: &'a S,
    config: &'a QueryConfig,
    reporter: &'a dyn QualityReporter,
}

impl<'a, S: ScheduleSource + ?Sized> ConnectionFinder<'a, S> {
    /// Create a new finder reporting data-quality issues through `tracing`.
    pub fn new(source: &'a S, config: &'a QueryConfig) -> Self {
        Self {
            source,
            config,
            reporter: &DEFAULT_REPORTER,
        }
    }

    /// Use a different data-quality reporter.
    pub fn with_reporter(mut self, reporter: &'a dyn QualityReporter) -> Self {
        self.reporter = reporter;
        self
    }

    /// Close one anchor stop into its cluster.
    pub fn cluster(&self, seed: &StopId) -> Result<StopCluster, SourceError> {
        close_stops(self.source, [seed.clone()])
    }

    /// Resolve the services running on `date`, reporting contradictory
    /// exceptions.
    pub fn active_services(&self, date: ServiceDate) -> Result<ActiveServices, SourceError> {
        let calendars = self.source.calendars()?;
        let exceptions = self.source.calendar_exceptions(date)?;
        let active = resolve_active_services(&calendars, &exceptions, date);

        if !active.ambiguous().is_empty() {
            self.reporter.ambiguous_exceptions(date, active.ambiguous());
        }

        Ok(active)
    }

    /// Find every direct connection for the request, ordered by departure
    /// time then trip id.
    ///
    /// Unknown stops, dates without service and windows without trips all
    /// give an empty list rather than an error.
    pub fn find_direct_connections(
        &self,
        request: &ConnectionRequest,
    ) -> Result<Vec<ConnectionMatch>, QueryError> {
        let start = self.cluster(&request.start)?;
        let end = self.cluster(&request.end)?;
        let active = self.active_services(request.date)?;

        debug!(
            start = %request.start,
            end = %request.end,
            date = %request.date,
            start_cluster = start.len(),
            end_cluster = end.len(),
            active_services = active.len(),
            "resolved connection query inputs"
        );

        self.search_clusters(
            &start,
            &end,
            &active,
            &request.min_time,
            &request.max_time,
        )
        .map_err(QueryError::from)
    }

    /// Search with clusters and services already resolved.
    pub fn search_clusters(
        &self,
        start: &StopCluster,
        end: &StopCluster,
        active: &ActiveServices,
        min_time: &ScheduleTime,
        max_time: &ScheduleTime,
    ) -> Result<Vec<ConnectionMatch>, SourceError> {
        if start.is_empty() || end.is_empty() || active.is_empty() {
            return Ok(Vec::new());
        }

        let departures: Vec<StopTime> = self
            .source
            .stop_times_for_stops(start.as_set())?
            .into_iter()
            .filter(|st| &st.departure_time >= min_time)
            .collect();

        let mut arrivals_by_trip: HashMap<TripId, Vec<StopTime>> = HashMap::new();
        for st in self.source.stop_times_for_stops(end.as_set())? {
            if &st.arrival_time <= max_time {
                arrivals_by_trip
                    .entry(st.trip_id.clone())
                    .or_default()
                    .push(st);
            }
        }

        // Start visit strictly before end visit on the same trip
        let pairs: Vec<(&StopTime, &StopTime)> = departures
            .iter()
            .flat_map(|dep| {
                arrivals_by_trip
                    .get(&dep.trip_id)
                    .into_iter()
                    .flatten()
                    .filter(move |arr| dep.sequence < arr.sequence)
                    .map(move |arr| (dep, arr))
            })
            .collect();

        if pairs.is_empty() {
            return Ok(Vec::new());
        }

        let matches = self.enrich(&pairs, active)?;
        debug!(
            departures = departures.len(),
            candidate_pairs = pairs.len(),
            matches = matches.len(),
            "connection search finished"
        );

        Ok(matches)
    }

    /// Attach trip, route, agency and stop names, drop inactive trips, sort.
    fn enrich(
        &self,
        pairs: &[(&StopTime, &StopTime)],
        active: &ActiveServices,
    ) -> Result<Vec<ConnectionMatch>, SourceError> {
        let trip_ids: BTreeSet<TripId> = pairs.iter().map(|(dep, _)| dep.trip_id.clone()).collect();
        let trips: HashMap<_, _> = self
            .source
            .trips_by_ids(&trip_ids)?
            .into_iter()
            .map(|t| (t.id.clone(), t))
            .collect();

        let route_ids: BTreeSet<RouteId> = trips
            .values()
            .filter(|t| active.contains(&t.service_id))
            .map(|t| t.route_id.clone())
            .collect();
        let routes: HashMap<_, _> = self
            .source
            .routes_by_ids(&route_ids)?
            .into_iter()
            .map(|r| (r.id.clone(), r))
            .collect();

        let agency_ids: BTreeSet<AgencyId> = routes.values().map(|r| r.agency_id.clone()).collect();
        let agencies: HashMap<_, _> = self
            .source
            .agencies_by_ids(&agency_ids)?
            .into_iter()
            .map(|a| (a.id, a.name))
            .collect();

        let stop_ids: BTreeSet<StopId> = pairs
            .iter()
            .flat_map(|(dep, arr)| [dep.stop_id.clone(), arr.stop_id.clone()])
            .collect();
        let stop_names: HashMap<_, _> = self
            .source
            .stops_by_ids(&stop_ids)?
            .into_iter()
            .map(|s| (s.id, s.name))
            .collect();

        // One report per missing row, however many pairs point at it
        let mut dangling: BTreeSet<(&'static str, &str)> = BTreeSet::new();
        let mut matches = Vec::with_capacity(pairs.len());
        for (dep, arr) in pairs {
            let Some(trip) = trips.get(&dep.trip_id) else {
                dangling.insert(("trips", dep.trip_id.as_str()));
                continue;
            };
            if !active.contains(&trip.service_id) {
                continue;
            }
            let Some(route) = routes.get(&trip.route_id) else {
                dangling.insert(("routes", trip.route_id.as_str()));
                continue;
            };
            let Some(agency_name) = agencies.get(&route.agency_id) else {
                dangling.insert(("agencies", route.agency_id.as_str()));
                continue;
            };
            let (Some(from_name), Some(to_name)) =
                (stop_names.get(&dep.stop_id), stop_names.get(&arr.stop_id))
            else {
                for stop in [&dep.stop_id, &arr.stop_id] {
                    if !stop_names.contains_key(stop) {
                        dangling.insert(("stops", stop.as_str()));
                    }
                }
                continue;
            };

            matches.push(ConnectionMatch {
                trip_id: trip.id.clone(),
                trip_short_name: trip.short_name.clone(),
                headsign: trip.headsign.clone(),
                service_id: trip.service_id.clone(),
                route_id: route.id.clone(),
                route_short_name: route.short_name.clone(),
                agency_name: agency_name.clone(),
                from_stop_id: dep.stop_id.clone(),
                from_stop_name: from_name.clone(),
                from_sequence: dep.sequence,
                departure_time: dep.departure_time.clone(),
                to_stop_id: arr.stop_id.clone(),
                to_stop_name: to_name.clone(),
                to_sequence: arr.sequence,
                arrival_time: arr.arrival_time.clone(),
            });
        }

        for (table, id) in dangling {
            self.reporter.dangling_reference(table, id);
        }

        matches.sort_by(|a, b| {
            a.departure_time
                .cmp(&b.departure_time)
                .then_with(|| a.trip_id.cmp(&b.trip_id))
                .then(a.from_sequence.cmp(&b.from_sequence))
                .then(a.to_sequence.cmp(&b.to_sequence))
        });

        if let Some(max) = self.config.max_results {
            matches.truncate(max);
        }

        Ok(matches)
    }
}
