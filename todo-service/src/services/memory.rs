use async_trait::async_trait;
use service_core::error::AppError;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::models::Todo;
use crate::services::TodoStore;

/// Process-local todo store keyed by id.
///
/// Ordered by id so `list` matches the descending-`_id` order of the
/// MongoDB gateway.
#[derive(Clone, Default)]
pub struct InMemoryTodoStore {
    todos: Arc<RwLock<BTreeMap<String, Todo>>>,
}

impl InMemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.todos.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.todos.read().await.is_empty()
    }

    pub async fn get(&self, id: &str) -> Option<Todo> {
        self.todos.read().await.get(id).cloned()
    }
}

#[async_trait]
impl TodoStore for InMemoryTodoStore {
    async fn list(&self) -> Result<Vec<Todo>, AppError> {
        Ok(self.todos.read().await.values().rev().cloned().collect())
    }

    async fn insert(&self, todo: &Todo) -> Result<(), AppError> {
        let mut todos = self.todos.write().await;
        if todos.contains_key(&todo.id) {
            return Err(AppError::DatabaseError(anyhow::anyhow!(
                "duplicate key: {}",
                todo.id
            )));
        }
        todos.insert(todo.id.clone(), todo.clone());
        Ok(())
    }

    async fn replace(&self, todo: &Todo) -> Result<bool, AppError> {
        match self.todos.write().await.get_mut(&todo.id) {
            Some(existing) => {
                existing.title = todo.title.clone();
                existing.done = todo.done;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        Ok(self.todos.write().await.remove(id).is_some())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
