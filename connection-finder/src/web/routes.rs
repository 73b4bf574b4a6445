//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::domain::{ScheduleTime, ServiceDate, StopId, TripId};
use crate::query::{ConnectionRequest, QueryError, trip_report};
use crate::source::SourceError;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/connections", get(find_connections))
        .route("/api/stops/:id/cluster", get(stop_cluster))
        .route("/api/services", get(active_services))
        .route("/api/trips/:id", get(trip_schedule))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

fn parse_date(value: &str) -> Result<ServiceDate, AppError> {
    ServiceDate::parse(value).map_err(|e| AppError::BadRequest {
        message: e.to_string(),
    })
}

fn parse_time(value: Option<&str>) -> Result<Option<ScheduleTime>, AppError> {
    value
        .map(ScheduleTime::parse)
        .transpose()
        .map_err(|e| AppError::BadRequest {
            message: e.to_string(),
        })
}

/// Direct connections between two stations.
async fn find_connections(
    State(state): State<AppState>,
    Query(req): Query<ConnectionsRequest>,
) -> Result<Json<ConnectionsResponse>, AppError> {
    let date = parse_date(&req.date)?;
    let (min_time, max_time) = state.config().window(
        parse_time(req.min_time.as_deref())?,
        parse_time(req.max_time.as_deref())?,
    );

    let request = ConnectionRequest::new(
        StopId::new(req.from.as_str()),
        StopId::new(req.to.as_str()),
        date,
        min_time,
        max_time,
    );
    let matches = state.finder.find_direct_connections(&request).await?;

    Ok(Json(ConnectionsResponse {
        from: req.from,
        to: req.to,
        date: date.encode(),
        min_time: request.min_time.to_string(),
        max_time: request.max_time.to_string(),
        connections: matches.iter().map(ConnectionResult::from_match).collect(),
    }))
}

/// Stops clustered with a stop.
async fn stop_cluster(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ClusterResponse>, AppError> {
    let seed = StopId::new(id);
    let cluster = state.finder.cluster(&seed).await?;
    Ok(Json(ClusterResponse::from_cluster(&seed, &cluster)))
}

/// Services running on a date.
async fn active_services(
    State(state): State<AppState>,
    Query(req): Query<ServicesRequest>,
) -> Result<Json<ServicesResponse>, AppError> {
    let date = parse_date(&req.date)?;
    let active = state.finder.active_services(date).await?;
    Ok(Json(ServicesResponse::from_active(&active)))
}

/// Full schedule of one trip.
async fn trip_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TripResponse>, AppError> {
    let trip_id = TripId::new(id);
    let report = trip_report(state.schedule(), &trip_id)?.ok_or_else(|| AppError::NotFound {
        message: format!("Trip {trip_id} not found"),
    })?;
    Ok(Json(TripResponse::from_report(&report)))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<SourceError> for AppError {
    fn from(e: SourceError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl From<QueryError> for AppError {
    fn from(e: QueryError) -> Self {
        match e {
            QueryError::InvalidDate(_) | QueryError::InvalidTime(_) => AppError::BadRequest {
                message: e.to_string(),
            },
            QueryError::Source(e) => e.into(),
        }
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let message = match self {
            AppError::BadRequest { message }
            | AppError::NotFound { message }
            | AppError::Internal { message } => message,
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
