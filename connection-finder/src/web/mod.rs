//! Web layer for the connection finder.
//!
//! Provides JSON endpoints for connection searches, stop clusters, service
//! calendars and trip schedules.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
