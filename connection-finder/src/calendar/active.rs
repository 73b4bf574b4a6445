//! Service activity for a single date.

use std::collections::{BTreeSet, HashSet};

use crate::domain::{Calendar, CalendarException, ExceptionType, ServiceDate, ServiceId};

/// The services running on one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveServices {
    date: ServiceDate,
    services: BTreeSet<ServiceId>,
    /// Services with both an ADDED and a REMOVED exception on `date`.
    ambiguous: BTreeSet<ServiceId>,
}

impl ActiveServices {
    /// The date these services were resolved for.
    pub fn date(&self) -> ServiceDate {
        self.date
    }

    pub fn contains(&self, service: &ServiceId) -> bool {
        self.services.contains(service)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ServiceId> {
        self.services.iter()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Services whose exceptions on this date were contradictory.
    ///
    /// They were resolved as removed. Callers may want to report them.
    pub fn ambiguous(&self) -> &BTreeSet<ServiceId> {
        &self.ambiguous
    }
}

/// Resolve which services run on `date`.
///
/// A calendar row makes its service active when `date` is within its
/// inclusive range and the weekday flag for `date` is set. Then every ADDED
/// exception on `date` makes its service active, even outside any calendar
/// range, and finally every REMOVED exception on `date` makes its service
/// inactive. Removals are applied last, so they win when a service carries
/// both kinds. Exceptions for other dates are ignored.
pub fn resolve_active_services(
    calendars: &[Calendar],
    exceptions: &[CalendarException],
    date: ServiceDate,
) -> ActiveServices {
    let weekday = date.weekday();

    let mut services: BTreeSet<ServiceId> = calendars
        .iter()
        .filter(|cal| cal.covers(date) && cal.runs_on(weekday))
        .map(|cal| cal.service_id.clone())
        .collect();

    let on_date: Vec<&CalendarException> = exceptions.iter().filter(|e| e.date == date).collect();

    let added: HashSet<&ServiceId> = on_date
        .iter()
        .filter(|e| e.exception_type == ExceptionType::Added)
        .map(|e| &e.service_id)
        .collect();
    let removed: HashSet<&ServiceId> = on_date
        .iter()
        .filter(|e| e.exception_type == ExceptionType::Removed)
        .map(|e| &e.service_id)
        .collect();

    services.extend(added.iter().map(|s| (*s).clone()));
    for service in &removed {
        services.remove(*service);
    }

    let ambiguous = added
        .intersection(&removed)
        .map(|s| (*s).clone())
        .collect();

    ActiveServices {
        date,
        services,
        ambiguous,
    }
}
