use async_trait::async_trait;
use service_core::error::AppError;

use crate::models::Todo;

/// Storage gateway for todos.
///
/// Every backend failure is reported as `AppError::DatabaseError` so callers
/// can answer with 503 rather than an opaque 500.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// All todos, newest identifier first.
    async fn list(&self) -> Result<Vec<Todo>, AppError>;

    async fn insert(&self, todo: &Todo) -> Result<(), AppError>;

    /// Overwrites `title` and `done` of the todo with `todo.id`.
    /// Returns `false` when no such todo exists.
    async fn replace(&self, todo: &Todo) -> Result<bool, AppError>;

    /// Returns `false` when no such todo exists.
    async fn delete(&self, id: &str) -> Result<bool, AppError>;

    async fn health_check(&self) -> Result<(), AppError>;

    fn backend(&self) -> &'static str;
}
