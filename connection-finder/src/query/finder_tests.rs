//! Unit tests for the direct connection search.

use super::*;
use crate::domain::{
    Agency, AgencyId, Calendar, CalendarException, Route, RouteId, ScheduleTime, ServiceDate,
    ServiceId, Stop, StopId, Trip, TripId,
};
use crate::source::{InMemorySchedule, ScheduleSnapshot, SourceError};
use crate::test_support::{FailingSource, calls, date, time};
use chrono::Weekday;
use std::collections::BTreeSet;
use std::sync::Mutex;

const FRIDAY: u32 = 20250829;
const SATURDAY: u32 = 20250830;
const SUNDAY: u32 = 20250831;

fn trip(id: &str, service: &str, route: &str) -> Trip {
    Trip {
        id: TripId::new(id),
        route_id: RouteId::new(route),
        service_id: ServiceId::new(service),
        short_name: None,
        headsign: None,
    }
}

/// Aarau and Basel, each a station with one platform, joined by a line
/// through three intermediate stops.
fn snapshot() -> ScheduleSnapshot {
    let mut stop_times = Vec::new();
    // Start at sequence 1, end at sequence 5
    stop_times.extend(calls(
        "T1",
        &[
            ("A:1", "08:08:00", "08:10:00"),
            ("M1", "08:30:00", "08:31:00"),
            ("M2", "08:50:00", "08:51:00"),
            ("M3", "09:10:00", "09:11:00"),
            ("B:1", "09:40:00", "09:42:00"),
        ],
    ));
    stop_times.extend(calls(
        "REV",
        &[("B:1", "08:00:00", "08:00:00"), ("A:1", "08:50:00", "08:50:00")],
    ));
    stop_times.extend(calls(
        "SAT",
        &[("A", "08:30:00", "08:30:00"), ("B", "09:30:00", "09:30:00")],
    ));
    stop_times.extend(calls(
        "EARLY",
        &[("A:1", "07:00:00", "07:00:00"), ("B:1", "07:50:00", "07:50:00")],
    ));
    stop_times.extend(calls(
        "NIGHT",
        &[("A:1", "23:50:00", "23:50:00"), ("B:1", "24:40:00", "24:40:00")],
    ));

    ScheduleSnapshot {
        stops: vec![
            Stop::new("A", "Aarau"),
            Stop::new("A:1", "Aarau platform 1").with_parent("A"),
            Stop::new("M1", "Frick"),
            Stop::new("M2", "Stein-Säckingen"),
            Stop::new("M3", "Rheinfelden"),
            Stop::new("B", "Basel SBB"),
            Stop::new("B:1", "Basel SBB platform 1").with_parent("B"),
        ],
        routes: vec![Route {
            id: RouteId::new("R1"),
            short_name: "IR 36".to_string(),
            agency_id: AgencyId::new("SBB"),
        }],
        agencies: vec![Agency {
            id: AgencyId::new("SBB"),
            name: "SBB".to_string(),
        }],
        trips: vec![
            trip("T1", "WD", "R1"),
            trip("REV", "WD", "R1"),
            trip("SAT", "SA", "R1"),
            trip("EARLY", "WD", "R1"),
            trip("NIGHT", "WD", "R1"),
        ],
        stop_times,
        calendars: vec![
            Calendar::new(
                "WD",
                date(20250101),
                date(20251231),
                &[
                    Weekday::Mon,
                    Weekday::Tue,
                    Weekday::Wed,
                    Weekday::Thu,
                    Weekday::Fri,
                ],
            ),
            Calendar::new("SA", date(20250101), date(20251231), &[Weekday::Sat]),
        ],
        ..Default::default()
    }
}

fn schedule() -> InMemorySchedule {
    InMemorySchedule::from_snapshot(snapshot())
}

fn request(on: u32, min: &str, max: &str) -> ConnectionRequest {
    ConnectionRequest::new(StopId::new("A"), StopId::new("B"), date(on), time(min), time(max))
}

fn trip_ids(matches: &[ConnectionMatch]) -> Vec<&str> {
    matches.iter().map(|m| m.trip_id.as_str()).collect()
}

fn search(schedule: &InMemorySchedule, request: &ConnectionRequest) -> Vec<ConnectionMatch> {
    let config = QueryConfig::default();
    ConnectionFinder::new(schedule, &config)
        .with_reporter(&SilentReporter)
        .find_direct_connections(request)
        .unwrap()
}

/// Records everything it is told.
#[derive(Default)]
struct RecordingReporter {
    ambiguous: Mutex<Vec<(ServiceDate, BTreeSet<ServiceId>)>>,
    dangling: Mutex<Vec<(&'static str, String)>>,
}

impl QualityReporter for RecordingReporter {
    fn ambiguous_exceptions(&self, date: ServiceDate, services: &BTreeSet<ServiceId>) {
        self.ambiguous
            .lock()
            .unwrap()
            .push((date, services.clone()));
    }

    fn dangling_reference(&self, table: &'static str, id: &str) {
        self.dangling.lock().unwrap().push((table, id.to_string()));
    }
}

#[test]
fn direct_trip_found_once() {
    let schedule = schedule();
    let matches = search(&schedule, &request(FRIDAY, "08:00:00", "20:00:00"));

    assert_eq!(trip_ids(&matches), vec!["T1"]);
    let m = &matches[0];
    assert_eq!(m.from_stop_id, StopId::new("A:1"));
    assert_eq!(m.from_stop_name, "Aarau platform 1");
    assert_eq!(m.from_sequence, 1);
    assert_eq!(m.departure_time, time("08:10:00"));
    assert_eq!(m.to_stop_id, StopId::new("B:1"));
    assert_eq!(m.to_sequence, 5);
    assert_eq!(m.arrival_time, time("09:40:00"));
    assert_eq!(m.route_short_name, "IR 36");
    assert_eq!(m.agency_name, "SBB");
    assert_eq!(m.duration_secs(), 90 * 60);
}

#[test]
fn window_bounds_are_inclusive() {
    let schedule = schedule();

    let matches = search(&schedule, &request(FRIDAY, "08:10:00", "09:40:00"));
    assert_eq!(trip_ids(&matches), vec!["T1"]);

    let matches = search(&schedule, &request(FRIDAY, "08:10:01", "20:00:00"));
    assert!(matches.is_empty());

    let matches = search(&schedule, &request(FRIDAY, "08:00:00", "09:39:59"));
    assert!(matches.is_empty());
}

#[test]
fn wrong_direction_excluded() {
    let schedule = schedule();
    let matches = search(&schedule, &request(FRIDAY, "00:00:00", "47:59:59"));

    assert!(!trip_ids(&matches).contains(&"REV"));

    // The same trip is found when asked the other way round
    let reverse = ConnectionRequest::new(
        StopId::new("B"),
        StopId::new("A"),
        date(FRIDAY),
        time("00:00:00"),
        time("47:59:59"),
    );
    assert_eq!(trip_ids(&search(&schedule, &reverse)), vec!["REV"]);
}

#[test]
fn inactive_service_excluded() {
    let schedule = schedule();

    let friday = search(&schedule, &request(FRIDAY, "08:00:00", "20:00:00"));
    assert!(!trip_ids(&friday).contains(&"SAT"));

    let saturday = search(&schedule, &request(SATURDAY, "08:00:00", "20:00:00"));
    assert_eq!(trip_ids(&saturday), vec!["SAT"]);
}

#[test]
fn no_service_on_date_is_empty() {
    let schedule = schedule();
    assert!(search(&schedule, &request(SUNDAY, "00:00:00", "47:59:59")).is_empty());
    // Outside every calendar range
    assert!(search(&schedule, &request(20260105, "00:00:00", "47:59:59")).is_empty());
}

#[test]
fn added_exception_enables_service() {
    let mut snapshot = snapshot();
    snapshot
        .calendar_exceptions
        .push(CalendarException::added("WD", date(SUNDAY)));
    let schedule = InMemorySchedule::from_snapshot(snapshot);

    let matches = search(&schedule, &request(SUNDAY, "08:00:00", "20:00:00"));
    assert_eq!(trip_ids(&matches), vec!["T1"]);
}

#[test]
fn removed_exception_disables_service() {
    let mut snapshot = snapshot();
    snapshot
        .calendar_exceptions
        .push(CalendarException::removed("WD", date(FRIDAY)));
    let schedule = InMemorySchedule::from_snapshot(snapshot);

    assert!(search(&schedule, &request(FRIDAY, "00:00:00", "47:59:59")).is_empty());
}

#[test]
fn unknown_stop_is_empty() {
    let schedule = schedule();
    let request = ConnectionRequest::new(
        StopId::new("NOPE"),
        StopId::new("B"),
        date(FRIDAY),
        time("00:00:00"),
        time("47:59:59"),
    );
    assert!(search(&schedule, &request).is_empty());
}

#[test]
fn overnight_trip_within_extended_window() {
    let schedule = schedule();

    let matches = search(&schedule, &request(FRIDAY, "08:00:00", "47:59:59"));
    assert_eq!(trip_ids(&matches), vec!["T1", "NIGHT"]);
    assert_eq!(matches[1].arrival_time, time("24:40:00"));
    assert_eq!(matches[1].duration_secs(), 50 * 60);

    // 24:40 is later than 23:59 as text, not earlier
    let matches = search(&schedule, &request(FRIDAY, "23:00:00", "23:59:59"));
    assert!(matches.is_empty());
}

#[test]
fn results_sorted_by_departure_then_trip() {
    let schedule = schedule();
    let matches = search(&schedule, &request(FRIDAY, "00:00:00", "47:59:59"));

    assert_eq!(trip_ids(&matches), vec!["EARLY", "T1", "NIGHT"]);

    let mut snapshot = snapshot();
    snapshot.trips.push(trip("ALPHA", "WD", "R1"));
    snapshot.stop_times.extend(calls(
        "ALPHA",
        &[("A:1", "08:10:00", "08:10:00"), ("B:1", "09:00:00", "09:00:00")],
    ));
    let schedule = InMemorySchedule::from_snapshot(snapshot);
    let matches = search(&schedule, &request(FRIDAY, "08:00:00", "20:00:00"));
    assert_eq!(trip_ids(&matches), vec!["ALPHA", "T1"]);
}

#[test]
fn trip_through_cluster_twice_yields_each_pair() {
    let mut snapshot = snapshot();
    snapshot.trips.push(trip("LOOP", "WD", "R1"));
    snapshot.stop_times.extend(calls(
        "LOOP",
        &[
            ("A", "10:00:00", "10:00:00"),
            ("B", "10:30:00", "10:30:00"),
            ("A:1", "11:00:00", "11:00:00"),
            ("B:1", "11:30:00", "11:30:00"),
        ],
    ));
    let schedule = InMemorySchedule::from_snapshot(snapshot);

    let matches = search(&schedule, &request(FRIDAY, "10:00:00", "12:00:00"));
    let pairs: Vec<(u32, u32)> = matches
        .iter()
        .map(|m| (m.from_sequence, m.to_sequence))
        .collect();
    assert_eq!(pairs, vec![(1, 2), (1, 4), (3, 4)]);
}

#[test]
fn max_results_truncates() {
    let schedule = schedule();
    let config = QueryConfig {
        max_results: Some(2),
        ..QueryConfig::default()
    };
    let matches = ConnectionFinder::new(&schedule, &config)
        .with_reporter(&SilentReporter)
        .find_direct_connections(&request(FRIDAY, "00:00:00", "47:59:59"))
        .unwrap();

    assert_eq!(trip_ids(&matches), vec!["EARLY", "T1"]);
}

#[test]
fn ambiguous_exceptions_reported_and_removed() {
    let mut snapshot = snapshot();
    snapshot.calendar_exceptions.extend([
        CalendarException::added("WD", date(FRIDAY)),
        CalendarException::removed("WD", date(FRIDAY)),
    ]);
    let schedule = InMemorySchedule::from_snapshot(snapshot);
    let config = QueryConfig::default();
    let reporter = RecordingReporter::default();

    let matches = ConnectionFinder::new(&schedule, &config)
        .with_reporter(&reporter)
        .find_direct_connections(&request(FRIDAY, "00:00:00", "47:59:59"))
        .unwrap();

    assert!(matches.is_empty());
    let ambiguous = reporter.ambiguous.lock().unwrap();
    assert_eq!(ambiguous.len(), 1);
    assert_eq!(ambiguous[0].0, date(FRIDAY));
    assert!(ambiguous[0].1.contains(&ServiceId::new("WD")));
}

#[test]
fn dangling_route_dropped_and_reported() {
    let mut snapshot = snapshot();
    snapshot.trips.push(trip("GHOST", "WD", "R404"));
    snapshot.stop_times.extend(calls(
        "GHOST",
        &[("A:1", "12:00:00", "12:00:00"), ("B:1", "13:00:00", "13:00:00")],
    ));
    let schedule = InMemorySchedule::from_snapshot(snapshot);
    let config = QueryConfig::default();
    let reporter = RecordingReporter::default();

    let matches = ConnectionFinder::new(&schedule, &config)
        .with_reporter(&reporter)
        .find_direct_connections(&request(FRIDAY, "08:00:00", "20:00:00"))
        .unwrap();

    assert_eq!(trip_ids(&matches), vec!["T1"]);
    let dangling = reporter.dangling.lock().unwrap();
    assert_eq!(dangling.as_slice(), &[("routes", "R404".to_string())]);
}

#[test]
fn dangling_trip_dropped_and_reported() {
    let mut snapshot = snapshot();
    snapshot.stop_times.extend(calls(
        "ORPHAN",
        &[("A:1", "12:00:00", "12:00:00"), ("B:1", "13:00:00", "13:00:00")],
    ));
    let schedule = InMemorySchedule::from_snapshot(snapshot);
    let config = QueryConfig::default();
    let reporter = RecordingReporter::default();

    let matches = ConnectionFinder::new(&schedule, &config)
        .with_reporter(&reporter)
        .find_direct_connections(&request(FRIDAY, "08:00:00", "20:00:00"))
        .unwrap();

    assert_eq!(trip_ids(&matches), vec!["T1"]);
    let dangling = reporter.dangling.lock().unwrap();
    assert_eq!(dangling.as_slice(), &[("trips", "ORPHAN".to_string())]);
}

#[test]
fn dangling_trip_reported_once_for_many_pairs() {
    let mut snapshot = snapshot();
    snapshot.stop_times.extend(calls(
        "ORPHAN",
        &[
            ("A:1", "12:00:00", "12:00:00"),
            ("B:1", "13:00:00", "13:00:00"),
            ("A:1", "14:00:00", "14:00:00"),
            ("B:1", "15:00:00", "15:00:00"),
        ],
    ));
    let schedule = InMemorySchedule::from_snapshot(snapshot);
    let config = QueryConfig::default();
    let reporter = RecordingReporter::default();

    let matches = ConnectionFinder::new(&schedule, &config)
        .with_reporter(&reporter)
        .find_direct_connections(&request(FRIDAY, "08:00:00", "20:00:00"))
        .unwrap();

    assert_eq!(trip_ids(&matches), vec!["T1"]);
    let dangling = reporter.dangling.lock().unwrap();
    assert_eq!(dangling.as_slice(), &[("trips", "ORPHAN".to_string())]);
}

#[test]
fn source_failure_propagates() {
    let config = QueryConfig::default();
    let err = ConnectionFinder::new(&FailingSource, &config)
        .find_direct_connections(&request(FRIDAY, "08:00:00", "20:00:00"))
        .unwrap_err();

    assert!(matches!(err, QueryError::Source(SourceError::Unavailable(_))));
}

#[test]
fn request_parse_rejects_bad_input() {
    let err = ConnectionRequest::parse("A", "B", 20250230, "08:00:00", "20:00:00").unwrap_err();
    assert!(matches!(err, QueryError::InvalidDate(_)));

    let err = ConnectionRequest::parse("A", "B", FRIDAY, "8h", "20:00:00").unwrap_err();
    assert!(matches!(err, QueryError::InvalidTime(_)));

    let ok = ConnectionRequest::parse("A", "B", FRIDAY, "08:00:00", "25:30:00").unwrap();
    assert_eq!(ok.date, date(FRIDAY));
    assert_eq!(ok.max_time, time("25:30:00"));
}

#[test]
fn active_services_for_date() {
    let schedule = schedule();
    let config = QueryConfig::default();
    let finder = ConnectionFinder::new(&schedule, &config);

    let friday = finder.active_services(date(FRIDAY)).unwrap();
    assert!(friday.contains(&ServiceId::new("WD")));
    assert!(!friday.contains(&ServiceId::new("SA")));

    let cluster = finder.cluster(&StopId::new("A")).unwrap();
    assert_eq!(cluster.len(), 2);
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn any_departures() -> impl Strategy<Value = Vec<(u32, u32)>> {
        // (departure minute of service day, trip length in minutes)
        proptest::collection::vec((0u32..30 * 60, 1u32..120), 0..20)
    }

    proptest! {
        /// Results come out ordered by departure, ties by trip id
        #[test]
        fn results_are_ordered(trips in any_departures()) {
            let mut snapshot = snapshot();
            for (i, (dep, len)) in trips.iter().enumerate() {
                let id = format!("P{i:02}");
                let dep_time = ScheduleTime::from_hms(dep / 60, dep % 60, 0).unwrap();
                let arr = dep + len;
                let arr_time = ScheduleTime::from_hms(arr / 60, arr % 60, 0).unwrap();
                snapshot.trips.push(trip(&id, "WD", "R1"));
                snapshot.stop_times.extend(calls(
                    &id,
                    &[
                        ("A:1", dep_time.as_str(), dep_time.as_str()),
                        ("B:1", arr_time.as_str(), arr_time.as_str()),
                    ],
                ));
            }
            let schedule = InMemorySchedule::from_snapshot(snapshot);
            let matches = search(&schedule, &request(FRIDAY, "00:00:00", "47:59:59"));

            prop_assert_eq!(matches.len(), trips.len() + 3);
            for pair in matches.windows(2) {
                let key = |m: &ConnectionMatch| (m.departure_time.clone(), m.trip_id.clone());
                prop_assert!(key(&pair[0]) <= key(&pair[1]));
            }
        }
    }
}
