//! Stop clusters.
//!
//! A station in a schedule is usually several stops: the station itself,
//! its platforms (children pointing at it through `parent_id`) and nearby
//! stops reachable through transfer links. A query anchored on one stop id
//! has to consider the whole group, so we expand seed ids to a fixed point.

use std::collections::BTreeSet;

use tracing::trace;

use crate::domain::StopId;
use crate::source::{ScheduleSource, SourceError};

/// An immutable set of stop ids closed under the parent/child and transfer
/// relations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopCluster {
    stops: BTreeSet<StopId>,
}

impl StopCluster {
    pub fn contains(&self, stop: &StopId) -> bool {
        self.stops.contains(stop)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StopId> {
        self.stops.iter()
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// The stop ids as a set, for source lookups.
    pub fn as_set(&self) -> &BTreeSet<StopId> {
        &self.stops
    }

    pub fn into_set(self) -> BTreeSet<StopId> {
        self.stops
    }
}

/// Expand `seeds` into every stop reachable through child stops and
/// transfers.
///
/// Each round looks up, for the current frontier, the stops that are either
/// in the frontier or children of it, plus the far end of every transfer
/// touching it. The frontier is then merged into the expanded set and the
/// next frontier is whatever was found that has not been expanded yet.
/// Rounds stop when nothing new turns up; this terminates on cyclic graphs
/// because expanded ids never re-enter the frontier.
///
/// Seeds are always part of the result, including ids the schedule does not
/// know (they simply match nothing later on).
pub fn close_stops<S: ScheduleSource + ?Sized>(
    source: &S,
    seeds: impl IntoIterator<Item = StopId>,
) -> Result<StopCluster, SourceError> {
    let mut expanded: BTreeSet<StopId> = BTreeSet::new();
    let mut frontier: BTreeSet<StopId> = seeds.into_iter().collect();
    let mut rounds = 0usize;

    while !frontier.is_empty() {
        rounds += 1;

        let found = expand_round(source, &frontier)?;

        expanded = expanded.union(&frontier).cloned().collect();
        frontier = found.difference(&expanded).cloned().collect();

        trace!(
            round = rounds,
            expanded = expanded.len(),
            frontier = frontier.len(),
            "stop closure round"
        );
    }

    Ok(StopCluster { stops: expanded })
}

/// Stops one step away from the frontier (the frontier's own known stops
/// included).
fn expand_round<S: ScheduleSource + ?Sized>(
    source: &S,
    frontier: &BTreeSet<StopId>,
) -> Result<BTreeSet<StopId>, SourceError> {
    let mut found: BTreeSet<StopId> = source
        .stops_within(frontier)?
        .into_iter()
        .map(|stop| stop.id)
        .collect();

    for transfer in source.transfers_touching(frontier)? {
        for end in [&transfer.from_id, &transfer.to_id] {
            if frontier.contains(end)
                && let Some(other) = transfer.opposite(end)
            {
                found.insert(other.clone());
            }
        }
    }

    Ok(found)
}
