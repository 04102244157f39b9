use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::doc,
    options::{ClientOptions, FindOptions},
    Client as MongoClient, Collection, Database,
};
use service_core::error::AppError;

use crate::models::{Todo, TodoDocument};
use crate::services::TodoStore;

pub const TODOS_COLLECTION: &str = "todos";

/// MongoDB-backed todo gateway.
///
/// Constructed once at startup; the driver opens and pools connections on
/// first use, so building this never touches the network for plain
/// `mongodb://` URIs.
#[derive(Clone)]
pub struct TodoDb {
    client: MongoClient,
    db: Database,
}

impl TodoDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        let mut options = ClientOptions::parse(uri).await.map_err(|e| {
            tracing::error!("Invalid MongoDB connection string: {}", e);
            AppError::ConfigError(anyhow::anyhow!("Invalid MONGODB_URI: {}", e))
        })?;
        options.app_name = Some("todo-service".to_string());

        let client = MongoClient::with_options(options).map_err(|e| {
            tracing::error!("Failed to create MongoDB client: {}", e);
            AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "MongoDB client configured");
        Ok(Self { client, db })
    }

    pub fn todos(&self) -> Collection<TodoDocument> {
        self.db.collection(TODOS_COLLECTION)
    }
}

#[async_trait]
impl TodoStore for TodoDb {
    async fn list(&self) -> Result<Vec<Todo>, AppError> {
        let find_options = FindOptions::builder().sort(doc! { "_id": -1 }).build();

        let cursor = self
            .todos()
            .find(doc! {}, find_options)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list todos: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;

        let docs: Vec<TodoDocument> = cursor.try_collect().await.map_err(|e| {
            tracing::error!("Failed to collect todos: {}", e);
            AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
        })?;

        Ok(docs.into_iter().map(Todo::from).collect())
    }

    async fn insert(&self, todo: &Todo) -> Result<(), AppError> {
        self.todos()
            .insert_one(TodoDocument::from(todo), None)
            .await
            .map_err(|e| {
                tracing::error!(todo_id = %todo.id, "Failed to insert todo: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;
        Ok(())
    }

    async fn replace(&self, todo: &Todo) -> Result<bool, AppError> {
        let update = doc! {
            "$set": {
                "title": todo.title.as_str(),
                "done": todo.done,
            }
        };

        let result = self
            .todos()
            .update_one(doc! { "_id": todo.id.as_str() }, update, None)
            .await
            .map_err(|e| {
                tracing::error!(todo_id = %todo.id, "Failed to update todo: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;

        Ok(result.matched_count > 0)
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let result = self
            .todos()
            .delete_one(doc! { "_id": id }, None)
            .await
            .map_err(|e| {
                tracing::error!(todo_id = %id, "Failed to delete todo: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;

        Ok(result.deleted_count > 0)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "mongodb"
    }
}
