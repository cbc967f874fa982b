//! Application state for Axum web framework.
//!
//! Contains shared services and resources that are accessible
//! across all request handlers.

use std::time::{Duration, Instant};

use crate::config::{ApiOptions, ApplicationConfig};
use crate::db::AsyncDbPool;
use crate::repositories::Repositories;
use crate::services::Services;

/// Application state containing all shared services and resources.
///
/// Cloning is cheap since the services hold their stores behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// All business logic services
    pub services: Services,
    /// Environment-driven API behavior
    pub options: ApiOptions,
    /// Name and version reported by the metadata and health routes
    pub application: ApplicationConfig,
    started_at: Instant,
}

impl AppState {
    /// Creates a new AppState backed by PostgreSQL.
    ///
    /// # Arguments
    /// * `pool` - The async database connection pool
    /// * `application` - Name and version of the running application
    /// * `options` - API behavior flags
    pub fn new(pool: AsyncDbPool, application: ApplicationConfig, options: ApiOptions) -> Self {
        let repos = Repositories::new(pool, options.log_queries);
        Self::from_repositories(repos, application, options)
    }

    /// Creates a new AppState over already constructed repositories.
    pub fn from_repositories(
        repos: Repositories,
        application: ApplicationConfig,
        options: ApiOptions,
    ) -> Self {
        Self {
            services: Services::new(repos),
            options,
            application,
            started_at: Instant::now(),
        }
    }

    /// Time elapsed since the state was created.
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}
