//! Service layer for business logic operations.
//!
//! Services encapsulate business logic and coordinate between
//! repositories and handlers.

mod health_service;
mod user_service;

pub use health_service::{DatabaseCheck, HealthService, HealthStatus};
pub use user_service::UserService;

use crate::repositories::Repositories;

/// Aggregates all services for convenient access.
///
/// This struct is designed to be used as Axum application state.
/// Cloning is cheap since every store sits behind an `Arc`.
#[derive(Clone)]
pub struct Services {
    pub users: UserService,
    pub health: HealthService,
}

impl Services {
    /// Creates a new Services instance from Repositories.
    pub fn new(repos: Repositories) -> Self {
        Self {
            users: UserService::new(repos.users.clone()),
            health: HealthService::new(repos.users),
        }
    }
}
