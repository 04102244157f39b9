use service_core::observability::init_tracing;
use todo_service::config::TodoConfig;
use todo_service::services::init_metrics;
use todo_service::startup::Application;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Load configuration - fail fast when MONGODB_URI is missing
    let config = TodoConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    init_tracing("todo-service", &config.common.log_level);
    init_metrics();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting todo service");

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to build application: {}", e);
        std::io::Error::other(format!("Startup error: {}", e))
    })?;

    app.run_until_stopped().await
}
