//! User service for business logic operations.
//!
//! Applies the existence and uniqueness rules on top of the user store.
//! Input is expected to be validated already.

use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::{NewUser, User, UserChanges};
use crate::repositories::UserStore;

/// User service for handling user-related business logic.
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    /// Creates a new UserService over the given store.
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Lists all users, most recently created first.
    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        self.store.list_recent().await
    }

    /// Creates a new user.
    ///
    /// # Arguments
    /// * `new_user` - Validated name and email
    ///
    /// # Returns
    /// The generated id
    ///
    /// # Errors
    /// `Duplicate` if the email already belongs to a user. The lookup and the
    /// insert are separate statements; a concurrent insert that wins the race
    /// is rejected by the unique constraint and reported the same way.
    pub async fn create_user(&self, new_user: NewUser) -> AppResult<i32> {
        if self.store.find_id_by_email(&new_user.email).await?.is_some() {
            return Err(AppError::email_taken(&new_user.email));
        }

        let id = self.store.insert(&new_user).await?;
        tracing::info!(user_id = id, "User created");
        Ok(id)
    }

    /// Replaces name and email of an existing user.
    ///
    /// Issues a single update; the unique email constraint reports a clash
    /// with another user.
    ///
    /// # Errors
    /// `NotFound` if no row has the id, `Duplicate` if the email belongs to
    /// another user.
    pub async fn update_user(&self, id: i32, changes: UserChanges) -> AppResult<()> {
        match self.store.update(id, &changes).await? {
            0 => Err(AppError::user_not_found(id)),
            _ => Ok(()),
        }
    }

    /// Deletes a user.
    ///
    /// # Errors
    /// `NotFound` if no row has the id.
    pub async fn delete_user(&self, id: i32) -> AppResult<()> {
        match self.store.delete(id).await? {
            0 => Err(AppError::user_not_found(id)),
            _ => {
                tracing::info!(user_id = id, "User deleted");
                Ok(())
            }
        }
    }
}
