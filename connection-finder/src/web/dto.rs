//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::calendar::{ActiveServices, DateRange};
use crate::cluster::StopCluster;
use crate::domain::StopId;
use crate::query::{ConnectionMatch, TripReport};

/// Query string for a connection search.
#[derive(Debug, Deserialize)]
pub struct ConnectionsRequest {
    /// Start stop or station id
    pub from: String,

    /// End stop or station id
    pub to: String,

    /// Service date, `YYYYMMDD` or `YYYY-MM-DD`
    pub date: String,

    /// Earliest departure, "HH:MM:SS" (defaults to start of day)
    pub min_time: Option<String>,

    /// Latest arrival, "HH:MM:SS" (defaults to the configured bound)
    pub max_time: Option<String>,
}

/// One direct connection.
#[derive(Debug, Serialize)]
pub struct ConnectionResult {
    pub trip_id: String,
    pub trip_short_name: Option<String>,
    pub headsign: Option<String>,

    /// Route short name (e.g., "IC 1")
    pub route: String,

    /// Agency name
    pub agency: String,

    pub from_stop_id: String,
    pub from_stop_name: String,
    pub departure: String,

    pub to_stop_id: String,
    pub to_stop_name: String,
    pub arrival: String,

    /// Travel time in minutes, rounded down
    pub duration_mins: u32,
}

/// Response for a connection search.
#[derive(Debug, Serialize)]
pub struct ConnectionsResponse {
    pub from: String,
    pub to: String,
    /// Date as `YYYYMMDD`
    pub date: u32,
    pub min_time: String,
    pub max_time: String,
    pub connections: Vec<ConnectionResult>,
}

/// Response listing the stops of a cluster.
#[derive(Debug, Serialize)]
pub struct ClusterResponse {
    pub seed: String,
    pub stops: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ServicesRequest {
    /// Service date, `YYYYMMDD` or `YYYY-MM-DD`
    pub date: String,
}

/// Services running on a date.
#[derive(Debug, Serialize)]
pub struct ServicesResponse {
    pub date: u32,
    pub services: Vec<String>,

    /// Services with both an added and a removed exception on the date
    pub ambiguous: Vec<String>,
}

/// A stop visit in a trip report.
#[derive(Debug, Serialize)]
pub struct CallResult {
    pub sequence: u32,
    pub stop_id: String,
    pub stop_name: Option<String>,
    pub arrival: String,
    pub departure: String,
}

/// Weekly pattern of a trip's service.
#[derive(Debug, Serialize)]
pub struct CalendarResult {
    pub start_date: u32,
    pub end_date: u32,

    /// Weekday abbreviations, Monday first
    pub days: Vec<String>,
}

/// Full schedule of one trip.
#[derive(Debug, Serialize)]
pub struct TripResponse {
    pub trip_id: String,
    pub short_name: Option<String>,
    pub headsign: Option<String>,
    pub service_id: String,
    pub route: Option<String>,
    pub agency: Option<String>,
    pub calendar: Option<CalendarResult>,

    /// Dates added by exception, single dates as numbers and runs as
    /// `{start, end}`
    pub added: Vec<DateRange>,

    /// Dates removed by exception
    pub removed: Vec<DateRange>,

    pub calls: Vec<CallResult>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// Conversion implementations

impl ConnectionResult {
    pub fn from_match(m: &ConnectionMatch) -> Self {
        Self {
            trip_id: m.trip_id.to_string(),
            trip_short_name: m.trip_short_name.clone(),
            headsign: m.headsign.clone(),
            route: m.route_short_name.clone(),
            agency: m.agency_name.clone(),
            from_stop_id: m.from_stop_id.to_string(),
            from_stop_name: m.from_stop_name.clone(),
            departure: m.departure_time.to_string(),
            to_stop_id: m.to_stop_id.to_string(),
            to_stop_name: m.to_stop_name.clone(),
            arrival: m.arrival_time.to_string(),
            duration_mins: m.duration_secs() / 60,
        }
    }
}

impl ClusterResponse {
    pub fn from_cluster(seed: &StopId, cluster: &StopCluster) -> Self {
        Self {
            seed: seed.to_string(),
            stops: cluster.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ServicesResponse {
    pub fn from_active(active: &ActiveServices) -> Self {
        Self {
            date: active.date().encode(),
            services: active.iter().map(|s| s.to_string()).collect(),
            ambiguous: active.ambiguous().iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl TripResponse {
    pub fn from_report(report: &TripReport) -> Self {
        Self {
            trip_id: report.trip.id.to_string(),
            short_name: report.trip.short_name.clone(),
            headsign: report.trip.headsign.clone(),
            service_id: report.trip.service_id.to_string(),
            route: report.route.as_ref().map(|r| r.short_name.clone()),
            agency: report.agency.as_ref().map(|a| a.name.clone()),
            calendar: report.calendar.as_ref().map(|c| CalendarResult {
                start_date: c.start_date.encode(),
                end_date: c.end_date.encode(),
                days: c.days().iter().map(|d| d.to_string()).collect(),
            }),
            added: report.added.clone(),
            removed: report.removed.clone(),
            calls: report
                .calls
                .iter()
                .map(|c| CallResult {
                    sequence: c.sequence,
                    stop_id: c.stop_id.to_string(),
                    stop_name: c.stop_name.clone(),
                    arrival: c.arrival_time.to_string(),
                    departure: c.departure_time.to_string(),
                })
                .collect(),
        }
    }
}
