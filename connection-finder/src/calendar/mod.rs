//! Service calendars.
//!
//! Resolves which services run on a date from weekly patterns plus per-date
//! exceptions, and compresses sets of dates into ranges for display.

mod active;
mod ranges;

pub use active::{ActiveServices, resolve_active_services};
pub use ranges::{DateRange, compress_dates, compress_service_dates};
