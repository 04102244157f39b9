#![allow(dead_code)]

use secrecy::Secret;
use service_core::config::Config as CoreConfig;
use std::sync::Arc;
use todo_service::config::{MongoConfig, StoreConfig, TodoConfig};
use todo_service::services::TodoStore;
use todo_service::startup::Application;

// Nothing listens on port 1; keep driver timeouts short so 503s come back fast.
pub const UNREACHABLE_MONGODB_URI: &str =
    "mongodb://127.0.0.1:1/?serverSelectionTimeoutMS=200&connectTimeoutMS=200";

pub fn test_mongodb_uri() -> String {
    std::env::var("TEST_MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string())
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub store: Arc<dyn TodoStore>,
    pub client: reqwest::Client,
    /// Set when the app runs against a live MongoDB.
    pub database: Option<String>,
}

impl TestApp {
    /// Spawn the service on a random port with the in-memory store.
    pub async fn spawn() -> Self {
        Self::spawn_with(StoreConfig::Memory).await
    }

    /// Spawn the service against a live MongoDB with a throwaway database.
    pub async fn spawn_mongo() -> Self {
        let database = format!("todo_test_{}", uuid::Uuid::new_v4().simple());
        let mut app = Self::spawn_with(StoreConfig::Mongo(MongoConfig {
            uri: Secret::new(test_mongodb_uri()),
            database: database.clone(),
        }))
        .await;
        app.database = Some(database);
        app
    }

    /// Spawn the service against a MongoDB address that never answers.
    pub async fn spawn_with_unreachable_database() -> Self {
        Self::spawn_with(StoreConfig::Mongo(MongoConfig {
            uri: Secret::new(UNREACHABLE_MONGODB_URI.to_string()),
            database: format!("todo_test_{}", uuid::Uuid::new_v4().simple()),
        }))
        .await
    }

    async fn spawn_with(store: StoreConfig) -> Self {
        let config = TodoConfig {
            common: CoreConfig {
                port: 0,
                log_level: "error".to_string(),
            },
            store,
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);
        let store = app.store();

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to accept connections
        let client = reqwest::Client::new();
        let ready_url = format!("{}/metrics", address);
        for _ in 0..50 {
            if client.get(&ready_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            store,
            client,
            database: None,
        }
    }

    /// Raw handle on the `todos` collection, for seeding documents directly.
    pub async fn raw_todos(&self) -> mongodb::Collection<mongodb::bson::Document> {
        let database = self.database.as_deref().expect("App is not backed by MongoDB");
        let client = mongodb::Client::with_uri_str(test_mongodb_uri())
            .await
            .expect("Failed to create MongoDB client");
        client.database(database).collection("todos")
    }

    /// Drop the throwaway database, if any.
    pub async fn cleanup(&self) {
        if let Some(database) = &self.database {
            if let Ok(client) = mongodb::Client::with_uri_str(test_mongodb_uri()).await {
                client.database(database).drop(None).await.ok();
            }
        }
    }

    pub fn todos_url(&self) -> String {
        format!("{}/api/todos/", self.address)
    }

    pub fn todo_url(&self, id: &str) -> String {
        format!("{}/api/todos/{}", self.address, id)
    }

    pub async fn create_todo(&self, body: serde_json::Value) -> reqwest::Response {
        self.client
            .post(self.todos_url())
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn list_todos(&self) -> Vec<serde_json::Value> {
        let response = self
            .client
            .get(self.todos_url())
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status().as_u16(), 200);
        response.json().await.expect("Failed to parse response")
    }
}
