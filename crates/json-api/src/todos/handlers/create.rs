//! Create Todo Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use todo_app::todos::data::NewTodo;

use crate::{
    extensions::*,
    state::State,
    todos::{
        errors::into_status_error,
        models::{TodoResponse, validate_description},
    },
};

/// Create Todo Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateTodoRequest {
    pub description: String,
}

/// Create Todo Handler
///
/// Appends a todo to the end of the caller's list.
#[endpoint(
    tags("todos"),
    summary = "Create Todo",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Todo created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid request"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid or expired token"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateTodoRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<TodoResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;
    let description = validate_description(&json.into_inner().description)?;

    let todo = state
        .app
        .todos
        .create_todo(user, NewTodo { description })
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/api/v1/todos/{}", todo.id), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(todo.into()))
}
