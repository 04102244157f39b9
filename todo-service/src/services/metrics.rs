//! Prometheus metrics for todo-service.

use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use service_core::error::AppError;
use std::sync::OnceLock;

pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder. Safe to call more than once.
pub fn init_metrics() {
    METRICS_HANDLE.get_or_init(|| {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        if let Err(e) = metrics::set_global_recorder(recorder) {
            tracing::warn!("Metrics recorder already installed: {}", e);
        }
        handle
    });
}

/// Get metrics output in Prometheus text format.
pub fn get_metrics() -> String {
    match METRICS_HANDLE.get() {
        Some(handle) => {
            handle.run_upkeep();
            handle.render()
        }
        None => "# Metrics recorder not initialized\n".to_string(),
    }
}

/// Count one todo operation by outcome.
pub fn record_todo_operation(operation: &'static str, result: Result<(), &AppError>) {
    let outcome = match result {
        Ok(()) => "success",
        Err(AppError::NotFound(_)) => "not_found",
        Err(AppError::UnprocessableEntity(_)) => "invalid",
        Err(AppError::DatabaseError(_)) => "unavailable",
        Err(_) => "error",
    };

    counter!("todo_operations_total", "operation" => operation, "outcome" => outcome)
        .increment(1);
}
