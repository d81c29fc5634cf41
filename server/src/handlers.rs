//! One handler per endpoint.
//!
//! Each handler receives the shared [`TodoStore`] through router state,
//! performs a single store call and wraps the result in an [`Envelope`].
//! Input has already been validated by the extractors in `crate::extract`.

use axum::{
    extract::{OriginalUri, State},
    http::Method,
    Json,
};

use crate::error::ApiError;
use crate::extract::{Path, Query, ValidatedJson};
use crate::model::Todo;
use crate::schemas::{
    CreateTodo, DeletedCount, Envelope, Health, ListParams, RootInfo, UpdateTodo,
};
use crate::store::TodoStore;

type ApiResult<T> = Result<Json<Envelope<T>>, ApiError>;

pub async fn root() -> Json<RootInfo> {
    Json(RootInfo {
        code: 200,
        message: "Welcome to the todo API",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn health() -> Json<Health> {
    Json(Health {
        code: 200,
        status: "healthy",
        message: "service is running",
    })
}

pub async fn list_todos(
    State(store): State<TodoStore>,
    Query(params): Query<ListParams>,
) -> ApiResult<Vec<Todo>> {
    let todos = store
        .list(params.completed)
        .await
        .map_err(ApiError::store("list todos"))?;
    Ok(Json(Envelope::list(todos)))
}

pub async fn create_todo(
    State(store): State<TodoStore>,
    ValidatedJson(input): ValidatedJson<CreateTodo>,
) -> ApiResult<Todo> {
    let todo = store
        .create(input)
        .await
        .map_err(ApiError::store("create todo"))?;
    tracing::info!(id = todo.id, "todo created");
    Ok(Json(Envelope::created(todo)))
}

pub async fn get_todo(
    State(store): State<TodoStore>,
    Path(id): Path<i64>,
) -> ApiResult<Todo> {
    let todo = store
        .get(id)
        .await
        .map_err(ApiError::store("get todo"))?
        .ok_or(ApiError::NotFound { id })?;
    Ok(Json(Envelope::fetched(todo)))
}

pub async fn update_todo(
    State(store): State<TodoStore>,
    Path(id): Path<i64>,
    ValidatedJson(input): ValidatedJson<UpdateTodo>,
) -> ApiResult<Todo> {
    let todo = store
        .update(id, input)
        .await
        .map_err(ApiError::store("update todo"))?
        .ok_or(ApiError::NotFound { id })?;
    tracing::info!(id, completed = todo.completed, "todo updated");
    Ok(Json(Envelope::updated(todo)))
}

pub async fn delete_todo(
    State(store): State<TodoStore>,
    Path(id): Path<i64>,
) -> ApiResult<()> {
    let deleted = store
        .delete(id)
        .await
        .map_err(ApiError::store("delete todo"))?;
    if !deleted {
        return Err(ApiError::NotFound { id });
    }
    tracing::info!(id, "todo deleted");
    Ok(Json(Envelope::deleted()))
}

pub async fn delete_completed_todos(State(store): State<TodoStore>) -> ApiResult<DeletedCount> {
    let deleted_count = store
        .delete_completed()
        .await
        .map_err(ApiError::store("delete completed todos"))?;
    tracing::info!(deleted_count, "completed todos deleted");
    Ok(Json(Envelope::deleted_completed(deleted_count)))
}

pub async fn delete_all_todos(State(store): State<TodoStore>) -> ApiResult<DeletedCount> {
    let deleted_count = store
        .delete_all()
        .await
        .map_err(ApiError::store("delete all todos"))?;
    tracing::info!(deleted_count, "all todos deleted");
    Ok(Json(Envelope::deleted_all(deleted_count)))
}

/// Answers paths no route matches.
pub async fn no_route(OriginalUri(uri): OriginalUri) -> ApiError {
    ApiError::NoRoute {
        path: uri.path().to_string(),
    }
}

/// Answers a known path called with a method it does not serve.
pub async fn method_not_allowed(method: Method) -> ApiError {
    ApiError::MethodNotAllowed {
        method: method.to_string(),
    }
}
