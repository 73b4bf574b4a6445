//! Domain types for the schedule query engine.
//!
//! This module contains the identifiers, times, dates and table rows the
//! algorithms work on. Dates and times enforce their invariants at
//! construction time, so code that receives them can trust their validity.

mod date;
mod ids;
mod records;
mod time;

pub use date::{DateError, ServiceDate, decode_date, encode_date, weekday_of};
pub use ids::{AgencyId, RouteId, ServiceId, StopId, TripId};
pub use records::{
    Agency, Calendar, CalendarException, ExceptionType, Route, Stop, StopTime, Transfer, Trip,
};
pub use time::{ScheduleTime, TimeError};
