//! Data-quality reporting.
//!
//! The algorithms do not log on their own. Anything worth telling an operator
//! about the dataset goes through a [`QualityReporter`] handed to the finder.

use std::collections::BTreeSet;

use tracing::warn;

use crate::domain::{ServiceDate, ServiceId};

/// Receives data-quality findings made while answering a query.
pub trait QualityReporter: Send + Sync {
    /// Services carrying both an ADDED and a REMOVED exception on `date`.
    /// They have been resolved as not running.
    fn ambiguous_exceptions(&self, date: ServiceDate, services: &BTreeSet<ServiceId>);

    /// A row referenced an id missing from another table; the row was dropped.
    fn dangling_reference(&self, table: &'static str, id: &str);
}

/// Reports findings as `tracing` warnings.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl QualityReporter for TracingReporter {
    fn ambiguous_exceptions(&self, date: ServiceDate, services: &BTreeSet<ServiceId>) {
        let services: Vec<&str> = services.iter().map(|s| s.as_str()).collect();
        warn!(
            %date,
            ?services,
            "services both added and removed on the same date, treating as removed"
        );
    }

    fn dangling_reference(&self, table: &'static str, id: &str) {
        warn!(table, id, "dropping row with unresolved reference");
    }
}

/// Discards all findings.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentReporter;

impl QualityReporter for SilentReporter {
    fn ambiguous_exceptions(&self, _date: ServiceDate, _services: &BTreeSet<ServiceId>) {}

    fn dangling_reference(&self, _table: &'static str, _id: &str) {}
}
