//! Repository layer for data access operations.
//!
//! `UserStore` is the seam between the services and storage. The diesel
//! implementation talks to PostgreSQL; the in-memory one backs tests.

mod memory_user_repo;
mod user_repo;

pub use memory_user_repo::MemoryUserRepository;
pub use user_repo::UserRepository;

use std::sync::Arc;

use async_trait::async_trait;

use crate::db::AsyncDbPool;
use crate::error::AppResult;
use crate::models::{NewUser, User, UserChanges};

/// Storage operations for the `users` table.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// All users, newest `created_at` first.
    async fn list_recent(&self) -> AppResult<Vec<User>>;

    /// Id of the user owning `email`, if any.
    async fn find_id_by_email(&self, email: &str) -> AppResult<Option<i32>>;

    /// Inserts a user and returns the generated id.
    async fn insert(&self, new_user: &NewUser) -> AppResult<i32>;

    /// Replaces name and email of a user and refreshes `updated_at`.
    /// Returns the number of affected rows.
    async fn update(&self, user_id: i32, changes: &UserChanges) -> AppResult<usize>;

    /// Hard-deletes a user. Returns the number of affected rows.
    async fn delete(&self, user_id: i32) -> AppResult<usize>;

    /// Connectivity check.
    async fn ping(&self) -> AppResult<()>;
}

/// Aggregates all repositories for convenient access.
///
/// Cloning is cheap: every store sits behind an `Arc`.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserStore>,
}

impl Repositories {
    /// Creates the PostgreSQL-backed repositories.
    ///
    /// # Arguments
    /// * `pool` - The async database connection pool
    /// * `log_queries` - Log every generated SQL statement at debug level
    pub fn new(pool: AsyncDbPool, log_queries: bool) -> Self {
        Self {
            users: Arc::new(UserRepository::new(pool, log_queries)),
        }
    }

    /// Creates repositories around an arbitrary user store.
    pub fn with_user_store(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }
}
