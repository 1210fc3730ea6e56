//! List Todos Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    extensions::*,
    state::State,
    todos::{
        errors::into_status_error,
        models::{TodoResponse, into_responses},
    },
};

/// List Todos Handler
///
/// Returns the caller's todos in list order.
#[endpoint(
    tags("todos"),
    summary = "List Todos",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Todos in list order"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid or expired token"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<Vec<TodoResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let todos = state
        .app
        .todos
        .list_todos(user)
        .await
        .map_err(into_status_error)?;

    Ok(Json(into_responses(todos)))
}
