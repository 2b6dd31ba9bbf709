mod extract;

use std::collections::BTreeMap;

use axum::Json;
use axum::extract::Path;
use axum::{Router, extract::State, http::StatusCode, routing::get};

use crate::error::AppError;
use crate::models::ToDoList;
use crate::state::AppState;

pub use extract::JsonBody;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(info))
        .route("/todos", get(list_todos).post(create_todo))
        .route(
            "/todos/{id}",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
        .with_state(state)
}

async fn info() -> Json<BTreeMap<&'static str, &'static str>> {
    Json(BTreeMap::from([
        ("1. GET /todos", "Returns an array of all todo lists"),
        (
            "2. POST /todos",
            "Creates and saves new todo, returns the newly created resource",
        ),
        (
            "3. GET /todos/{id}",
            "Returns the todo list with the provided id, if existing",
        ),
        (
            "4. PUT /todos/{id}",
            "Overwrites the todo list with the provided id (if existing) with the provided new list.",
        ),
        (
            "5. DELETE /todos/{id}",
            "Deletes the todo list with the provided id, if existing",
        ),
    ]))
}

async fn list_todos(State(state): State<AppState>) -> Result<Json<Vec<ToDoList>>, AppError> {
    let lists = state.lists.get_all_lists().await?;
    Ok(Json(lists))
}

async fn create_todo(
    State(state): State<AppState>,
    JsonBody(list): JsonBody<ToDoList>,
) -> Result<(StatusCode, Json<ToDoList>), AppError> {
    // Invalid lists are answered here without calling the service.
    list.validate()?;
    let list = state.lists.save_list(list).await?;
    Ok((StatusCode::CREATED, Json(list)))
}

async fn get_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ToDoList>, AppError> {
    let list = state.lists.get_one_list_by_id(&id).await?;
    Ok(Json(list))
}

async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(list): JsonBody<ToDoList>,
) -> Result<Json<ToDoList>, AppError> {
    // Invalid lists are answered here without calling the service.
    list.validate()?;
    let list = state.lists.update_one_list_by_id(&id, list).await?;
    Ok(Json(list))
}

async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.lists.delete_list_by_id(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
