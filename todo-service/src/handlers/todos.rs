//! Todo CRUD handlers.
//!
//! Bodies are parsed by [`JsonBody`], so malformed input is rejected with 422
//! before the store is touched.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;

use crate::dtos::{DeleteTodoResponse, TodoRequest, TodoResponse};
use crate::middleware::JsonBody;
use crate::models::Todo;
use crate::services::record_todo_operation;
use crate::startup::AppState;

fn observe<T>(operation: &'static str, result: Result<T, AppError>) -> Result<T, AppError> {
    record_todo_operation(operation, result.as_ref().map(|_| ()));
    result
}

fn todo_not_found() -> AppError {
    AppError::NotFound(anyhow::anyhow!("Todo not found"))
}

#[tracing::instrument(skip(state))]
pub async fn list_todos(
    State(state): State<AppState>,
) -> Result<Json<Vec<TodoResponse>>, AppError> {
    let todos = observe("list", state.store.list().await)?;

    tracing::debug!(count = todos.len(), "Listed todos");

    Ok(Json(todos.into_iter().map(TodoResponse::from).collect()))
}

#[tracing::instrument(skip(state, request))]
pub async fn create_todo(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<TodoRequest>,
) -> Result<(StatusCode, Json<TodoResponse>), AppError> {
    let todo = Todo::new(request.title, request.done);

    observe("create", state.store.insert(&todo).await)?;

    tracing::info!(todo_id = %todo.id, "Todo created");

    Ok((StatusCode::CREATED, Json(TodoResponse::from(todo))))
}

#[tracing::instrument(skip(state, request))]
pub async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<TodoRequest>,
) -> Result<Json<TodoResponse>, AppError> {
    let todo = request.into_todo(id);

    let result = match state.store.replace(&todo).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(todo_not_found()),
        Err(e) => Err(e),
    };
    observe("update", result)?;

    tracing::info!(todo_id = %todo.id, done = todo.done, "Todo updated");

    Ok(Json(TodoResponse::from(todo)))
}

#[tracing::instrument(skip(state))]
pub async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteTodoResponse>, AppError> {
    let result = match state.store.delete(&id).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(todo_not_found()),
        Err(e) => Err(e),
    };
    observe("delete", result)?;

    tracing::info!(todo_id = %id, "Todo deleted");

    Ok(Json(DeleteTodoResponse { deleted: true }))
}
