//! Storage connectivity checks used by the health endpoints.

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::repositories::UserStore;

/// Health status enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// All systems operational
    Healthy,
    /// Storage is unreachable
    Unhealthy,
}

/// Outcome of a single database check.
#[derive(Debug, Clone)]
pub struct DatabaseCheck {
    pub connected: bool,
    pub response_time_ms: u64,
    /// Error chain of a failed check.
    pub error: Option<String>,
}

impl DatabaseCheck {
    pub fn status(&self) -> HealthStatus {
        if self.connected {
            HealthStatus::Healthy
        } else {
            HealthStatus::Unhealthy
        }
    }
}

#[derive(Clone)]
pub struct HealthService {
    store: Arc<dyn UserStore>,
}

impl HealthService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Runs `SELECT 1` through the pool and times it.
    pub async fn check_database(&self) -> DatabaseCheck {
        let start_time = Instant::now();
        let result = self.store.ping().await;
        let response_time_ms = start_time.elapsed().as_millis() as u64;

        match result {
            Ok(()) => DatabaseCheck {
                connected: true,
                response_time_ms,
                error: None,
            },
            Err(e) => {
                tracing::warn!(error = %e, "Database health check failed");
                DatabaseCheck {
                    connected: false,
                    response_time_ms,
                    error: Some(e.detail().unwrap_or_else(|| e.to_string())),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MemoryUserRepository;

    #[tokio::test]
    async fn test_check_reflects_store_availability() {
        let store = MemoryUserRepository::new();
        let service = HealthService::new(Arc::new(store.clone()));

        let check = service.check_database().await;
        assert!(check.connected);
        assert_eq!(check.status(), HealthStatus::Healthy);
        assert!(check.error.is_none());

        store.set_available(false);
        let check = service.check_database().await;
        assert_eq!(check.status(), HealthStatus::Unhealthy);
        assert_eq!(check.error.as_deref(), Some("connection refused"));
    }
}
