use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use connection_finder::config::ServerConfig;
use connection_finder::query::QueryConfig;
use connection_finder::source::{InMemorySchedule, ScheduleSnapshot};
use connection_finder::web::{AppState, create_router};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Load the snapshot (fail fast if unavailable)
    info!(path = %config.snapshot_path.display(), "loading schedule snapshot");
    let snapshot = match ScheduleSnapshot::load(&config.snapshot_path) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            error!("failed to load snapshot: {e}");
            return ExitCode::FAILURE;
        }
    };
    let schedule = InMemorySchedule::from_snapshot(snapshot);
    info!(
        stops = schedule.stop_count(),
        trips = schedule.trip_count(),
        calendars = schedule.calendar_count(),
        "schedule loaded"
    );

    let state = AppState::new(schedule, QueryConfig::default(), &config.cache);
    let app = create_router(state);

    let listener = match tokio::net::TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(addr = %config.bind_addr, "failed to bind: {e}");
            return ExitCode::FAILURE;
        }
    };
    info!(addr = %config.bind_addr, "connection finder listening");
    info!("  GET /health");
    info!("  GET /api/connections?from=&to=&date=[&min_time=&max_time=]");
    info!("  GET /api/stops/:id/cluster");
    info!("  GET /api/services?date=");
    info!("  GET /api/trips/:id");

    if let Err(e) = axum::serve(listener, app).await {
        error!("server error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
