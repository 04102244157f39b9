use serde::{Deserialize, Serialize};

use crate::models::Todo;

/// Body of create and update calls. Update replaces both fields, so an
/// omitted `done` resets the flag to `false`.
#[derive(Debug, Clone, Deserialize)]
pub struct TodoRequest {
    pub title: String,
    #[serde(default)]
    pub done: bool,
}

impl TodoRequest {
    pub fn into_todo(self, id: String) -> Todo {
        Todo {
            id,
            title: self.title,
            done: self.done,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoResponse {
    pub id: String,
    pub title: String,
    pub done: bool,
}

impl From<Todo> for TodoResponse {
    fn from(todo: Todo) -> Self {
        Self {
            id: todo.id,
            title: todo.title,
            done: todo.done,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteTodoResponse {
    pub deleted: bool,
}
