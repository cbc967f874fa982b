use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use jiff::Timestamp;

use super::UserStore;
use crate::error::{AppError, AppResult};
use crate::models::{NewUser, User, UserChanges};

#[derive(Default)]
struct Table {
    rows: BTreeMap<i32, User>,
    last_id: i32,
}

/// In-memory implementation of `UserStore`.
///
/// Mirrors the PostgreSQL table: ids come from a sequence and are never
/// reused, and emails are unique. The store can be switched offline to make
/// every call fail like an unreachable database.
#[derive(Clone, Default)]
pub struct MemoryUserRepository {
    table: Arc<RwLock<Table>>,
    offline: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggles whether storage calls succeed.
    pub fn set_available(&self, available: bool) {
        self.offline.store(!available, Ordering::SeqCst);
    }

    /// Number of storage calls made so far, failed ones included.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn enter(&self, operation: &str) -> AppResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(AppError::Database {
                operation: operation.to_string(),
                source: anyhow::anyhow!("connection refused"),
            });
        }
        Ok(())
    }

    fn poisoned(operation: &str) -> AppError {
        AppError::Database {
            operation: operation.to_string(),
            source: anyhow::anyhow!("user table lock poisoned"),
        }
    }
}

#[async_trait]
impl UserStore for MemoryUserRepository {
    async fn list_recent(&self) -> AppResult<Vec<User>> {
        self.enter("list users")?;
        let table = self.table.read().map_err(|_| Self::poisoned("list users"))?;

        let mut users: Vec<User> = table.rows.values().cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(users)
    }

    async fn find_id_by_email(&self, email: &str) -> AppResult<Option<i32>> {
        self.enter("find user by email")?;
        let table = self
            .table
            .read()
            .map_err(|_| Self::poisoned("find user by email"))?;

        Ok(table.rows.values().find(|u| u.email == email).map(|u| u.id))
    }

    async fn insert(&self, new_user: &NewUser) -> AppResult<i32> {
        self.enter("create user")?;
        let mut table = self.table.write().map_err(|_| Self::poisoned("create user"))?;

        if table.rows.values().any(|u| u.email == new_user.email) {
            return Err(AppError::email_taken(&new_user.email));
        }

        table.last_id += 1;
        let id = table.last_id;
        let now = Timestamp::now();
        table.rows.insert(
            id,
            User {
                id,
                name: new_user.name.clone(),
                email: new_user.email.clone(),
                created_at: now,
                updated_at: now,
            },
        );
        Ok(id)
    }

    async fn update(&self, user_id: i32, changes: &UserChanges) -> AppResult<usize> {
        self.enter("update user")?;
        let mut table = self.table.write().map_err(|_| Self::poisoned("update user"))?;

        // A missing row matches nothing, so no constraint is checked
        if !table.rows.contains_key(&user_id) {
            return Ok(0);
        }
        if table
            .rows
            .values()
            .any(|u| u.id != user_id && u.email == changes.email)
        {
            return Err(AppError::email_taken(&changes.email));
        }

        let Some(user) = table.rows.get_mut(&user_id) else {
            return Ok(0);
        };
        user.name = changes.name.clone();
        user.email = changes.email.clone();
        user.updated_at = Timestamp::now();
        Ok(1)
    }

    async fn delete(&self, user_id: i32) -> AppResult<usize> {
        self.enter("delete user")?;
        let mut table = self.table.write().map_err(|_| Self::poisoned("delete user"))?;

        Ok(usize::from(table.rows.remove(&user_id).is_some()))
    }

    async fn ping(&self) -> AppResult<()> {
        self.enter("check database")
    }
}
