//! Connection queries.
//!
//! This module ties the pieces together to answer: "which direct trips run
//! between these two stations on this date, within this time window?"
//!
//! Both anchors are closed into stop clusters, the calendar is resolved for
//! the date, and stop visits are joined per trip so that the start visit
//! comes strictly before the end visit.

mod config;
mod finder;
mod report;
mod reporter;

#[cfg(test)]
mod finder_tests;

pub use config::QueryConfig;
pub use finder::{ConnectionFinder, ConnectionMatch, ConnectionRequest, QueryError};
pub use report::{ReportCall, TripReport, trip_report};
pub use reporter::{QualityReporter, SilentReporter, TracingReporter};
