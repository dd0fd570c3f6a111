//! Storage collaborators for users and tasks.
//!
//! Handlers and the authentication core only see the `UserStore` and
//! `TaskStore` traits; `postgres` backs them with sqlx in production and
//! `memory` backs them with hash maps for tests and local experiments.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Task, TaskInput, TaskUpdate, User};

pub use memory::{InMemoryTaskStore, InMemoryUserStore};
pub use postgres::{PgTaskStore, PgUserStore};

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    /// Exact, case-sensitive match.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Fails with `AppError::BadRequest` when the email is already taken.
    async fn create(&self, email: &str, password_hash: &str) -> Result<User, AppError>;
}

/// Every operation is scoped to `user_id`; another user's task behaves as missing.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Newest first.
    async fn list(&self, user_id: Uuid, skip: i64, limit: i64) -> Result<Vec<Task>, AppError>;

    async fn create(&self, user_id: Uuid, input: TaskInput) -> Result<Task, AppError>;

    async fn get(&self, user_id: Uuid, id: Uuid) -> Result<Option<Task>, AppError>;

    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        update: TaskUpdate,
    ) -> Result<Option<Task>, AppError>;

    /// Returns whether a task was removed.
    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError>;

    async fn toggle_complete(&self, user_id: Uuid, id: Uuid) -> Result<Option<Task>, AppError>;
}

pub(crate) fn email_taken() -> AppError {
    AppError::BadRequest("Email already registered".into())
}
