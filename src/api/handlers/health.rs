//! Health check endpoint handlers.
//!
//! Used for monitoring and load balancer checks. `/health` and
//! `/health/ready` run a `SELECT 1` through the connection pool.

use crate::api::doc::HEALTH_TAG;
use crate::api::dto::{DatabaseState, HealthResponse};
use crate::services::HealthStatus;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::Json};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// Creates health check routes.
///
/// # Routes
/// - `GET /health` - Health check with database status
/// - `GET /health/ready` - Readiness check
/// - `GET /health/live` - Liveness check
pub fn health_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(health_check))
        .routes(routes!(readiness_check))
        .routes(routes!(liveness_check))
}

/// Basic health check endpoint.
///
/// # Responses
/// - `200 OK` - Service is healthy
/// - `503 Service Unavailable` - The database cannot be reached
///
/// # Example Response
/// ```json
/// {
///   "status": "healthy",
///   "version": "1.0.0",
///   "timestamp": "2024-01-01T12:00:00Z",
///   "uptime_seconds": 3600,
///   "database": "connected",
///   "response_time_ms": 2
/// }
/// ```
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Service is unhealthy", body = HealthResponse)
    ),
    tag = HEALTH_TAG
)]
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let check = state.services.health.check_database().await;

    let (status_code, database) = if check.connected {
        (StatusCode::OK, DatabaseState::Connected)
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, DatabaseState::Disconnected)
    };

    let response = HealthResponse {
        status: check.status(),
        version: state.application.version.clone(),
        timestamp: jiff::Timestamp::now().to_string(),
        uptime_seconds: state.uptime().as_secs(),
        database,
        response_time_ms: check.response_time_ms,
        error: check
            .error
            .filter(|_| state.options.expose_error_details),
    };

    (status_code, Json(response))
}

/// Readiness check endpoint.
///
/// # Responses
/// - `200 OK` - Service is ready
/// - `503 Service Unavailable` - Service is not ready
#[utoipa::path(
    get,
    path = "/health/ready",
    responses(
        (status = 200, description = "Service is ready"),
        (status = 503, description = "Service is not ready")
    ),
    tag = HEALTH_TAG
)]
pub async fn readiness_check(State(state): State<AppState>) -> StatusCode {
    match state.services.health.check_database().await.status() {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Liveness check endpoint. Does not touch the database.
#[utoipa::path(
    get,
    path = "/health/live",
    responses(
        (status = 200, description = "Service is alive")
    ),
    tag = HEALTH_TAG
)]
pub async fn liveness_check() -> StatusCode {
    StatusCode::OK
}
