pub mod todos;

pub use todos::{DeleteTodoResponse, TodoRequest, TodoResponse};
