use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::services::HealthStatus;

/// Database connectivity as reported by `/health`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseState {
    Connected,
    Disconnected,
}

/// Health check response structure.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Overall health status
    pub status: HealthStatus,
    /// Application version
    pub version: String,
    /// Timestamp of the health check (RFC 3339)
    #[schema(value_type = String, format = DateTime)]
    pub timestamp: String,
    /// Seconds since the server started
    pub uptime_seconds: u64,
    pub database: DatabaseState,
    /// Duration of the database check in milliseconds
    pub response_time_ms: u64,
    /// Check failure, only when error details are exposed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
