//! User repository for async database operations.
//!
//! Provides CRUD operations for the users table using diesel_async.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::query_builder::QueryFragment;
use diesel_async::RunQueryDsl;

use super::UserStore;
use crate::db::AsyncDbPool;
use crate::error::{AppResult, DatabaseErrorConverter};
use crate::models::{NewUser, User, UserChanges, UserRow};

/// User repository holding an async connection pool.
///
/// Since `AsyncDbPool` (bb8::Pool) internally uses `Arc`, cloning is cheap.
#[derive(Clone)]
pub struct UserRepository {
    pool: AsyncDbPool,
    log_queries: bool,
}

impl UserRepository {
    /// Creates a new UserRepository with the given connection pool.
    pub fn new(pool: AsyncDbPool, log_queries: bool) -> Self {
        Self { pool, log_queries }
    }

    fn trace_query<Q>(&self, query: &Q)
    where
        Q: QueryFragment<Pg>,
    {
        if self.log_queries {
            tracing::debug!(sql = %diesel::debug_query::<Pg, _>(query), "Executing query");
        }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn list_recent(&self) -> AppResult<Vec<User>> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        let query = users.order(created_at.desc()).select(UserRow::as_select());
        self.trace_query(&query);

        let rows = query
            .load(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "list users"))?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn find_id_by_email(&self, user_email: &str) -> AppResult<Option<i32>> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        let query = users.filter(email.eq(user_email)).select(id);
        self.trace_query(&query);

        query
            .first::<i32>(&mut conn)
            .await
            .optional()
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "find user by email"))
    }

    /// `created_at` and `updated_at` take their column defaults (`NOW()`).
    async fn insert(&self, new_user: &NewUser) -> AppResult<i32> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        let query = diesel::insert_into(users)
            .values(new_user)
            .returning(id);
        self.trace_query(&query);

        query
            .get_result::<i32>(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "create user"))
    }

    async fn update(&self, user_id: i32, changes: &UserChanges) -> AppResult<usize> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        let query = diesel::update(users.filter(id.eq(user_id)))
            .set((changes, updated_at.eq(diesel::dsl::now)));
        self.trace_query(&query);

        query
            .execute(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "update user"))
    }

    async fn delete(&self, user_id: i32) -> AppResult<usize> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        let query = diesel::delete(users.filter(id.eq(user_id)));
        self.trace_query(&query);

        query
            .execute(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "delete user"))
    }

    async fn ping(&self) -> AppResult<()> {
        let mut conn = self.pool.get().await?;

        diesel::sql_query("SELECT 1")
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "check database"))
    }
}
