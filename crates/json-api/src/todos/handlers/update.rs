//! Update Todo Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};

use todo_app::todos::{data::TodoUpdate, records::TodoId};

use crate::{
    extensions::*,
    state::State,
    todos::{
        errors::into_status_error,
        models::{TodoResponse, validate_description},
    },
};

/// Update Todo Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateTodoRequest {
    pub description: String,
    pub completed: bool,
}

/// Update Todo Handler
///
/// Replaces the description and completion flag. The position is untouched.
#[endpoint(
    tags("todos"),
    summary = "Update Todo",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Todo updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid request"),
        (status_code = StatusCode::NOT_FOUND, description = "Resource not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "todos.update",
    skip(id, json, depot),
    fields(user_uuid = tracing::field::Empty, todo_id = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    id: PathParam<i64>,
    json: JsonBody<UpdateTodoRequest>,
    depot: &mut Depot,
) -> Result<Json<TodoResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;
    let todo = TodoId::new(id.into_inner());
    let request = json.into_inner();

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(user));
    span.record("todo_id", tracing::field::display(todo));

    let update = TodoUpdate {
        description: validate_description(&request.description)?,
        completed: request.completed,
    };

    let todo = state
        .app
        .todos
        .update_todo(user, todo, update)
        .await
        .map_err(into_status_error)?;

    Ok(Json(todo.into()))
}
