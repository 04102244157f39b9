pub mod database;
pub mod memory;
pub mod metrics;
pub mod store;

pub use database::TodoDb;
pub use memory::InMemoryTodoStore;
pub use metrics::{get_metrics, init_metrics, record_todo_operation};
pub use store::TodoStore;
