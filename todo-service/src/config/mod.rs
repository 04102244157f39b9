use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

#[derive(Debug, Clone)]
pub struct TodoConfig {
    pub common: core_config::Config,
    pub store: StoreConfig,
}

/// Which backend holds the todos.
#[derive(Debug, Clone)]
pub enum StoreConfig {
    Mongo(MongoConfig),
    /// Process-local store; contents are lost on restart.
    Memory,
}

#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: Secret<String>,
    pub database: String,
}

pub const DEFAULT_DATABASE: &str = "todo_db";

impl StoreConfig {
    /// Configured MongoDB database name; `None` for the in-memory store.
    pub fn database(&self) -> Option<&str> {
        match self {
            StoreConfig::Mongo(mongo) => Some(&mongo.database),
            StoreConfig::Memory => None,
        }
    }
}

impl TodoConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        Self::from_lookup(common, |key| env::var(key).ok())
    }

    /// Builds the service settings from an arbitrary variable source.
    ///
    /// `MONGODB_URI` is mandatory for the mongo store; there is no fallback.
    pub fn from_lookup<F>(common: core_config::Config, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let store = match lookup("TODO_STORE").as_deref().map(str::to_ascii_lowercase) {
            None => StoreConfig::Mongo(mongo_config(&lookup)?),
            Some(kind) if kind == "mongo" || kind == "mongodb" => {
                StoreConfig::Mongo(mongo_config(&lookup)?)
            }
            Some(kind) if kind == "memory" => StoreConfig::Memory,
            Some(other) => {
                return Err(AppError::ConfigError(anyhow::anyhow!(
                    "TODO_STORE must be 'mongo' or 'memory', got '{}'",
                    other
                )))
            }
        };

        let common = match lookup("LOG_LEVEL") {
            Some(log_level) => core_config::Config { log_level, ..common },
            None => common,
        };

        Ok(TodoConfig { common, store })
    }
}

fn mongo_config<F>(lookup: &F) -> Result<MongoConfig, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    let uri = lookup("MONGODB_URI").ok_or_else(|| {
        AppError::ConfigError(anyhow::anyhow!("MONGODB_URI is required but not set"))
    })?;

    Ok(MongoConfig {
        uri: Secret::new(uri),
        database: lookup("MONGODB_DATABASE").unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
    })
}
