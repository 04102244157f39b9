//! HTTP handlers for todo-service.

pub mod health;
pub mod metrics;
pub mod todos;

pub use health::{health_check, readiness_check};
pub use metrics::metrics;
pub use todos::{create_todo, delete_todo, list_todos, update_todo};
