//! Search Todos Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};

use crate::{
    extensions::*,
    state::State,
    todos::{
        errors::into_status_error,
        models::{TodoResponse, into_responses},
    },
};

/// Search Todos Handler
///
/// Full-text match of `keyword` against the caller's todo descriptions.
#[endpoint(
    tags("todos"),
    summary = "Search Todos",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Matching todos in list order"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid request"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid or expired token"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    keyword: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<Vec<TodoResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let keyword = keyword
        .into_inner()
        .map(|keyword| keyword.trim().to_owned())
        .filter(|keyword| !keyword.is_empty())
        .ok_or_else(|| StatusError::bad_request().brief("Invalid request"))?;

    let todos = state
        .app
        .todos
        .search_todos(user, &keyword)
        .await
        .map_err(into_status_error)?;

    Ok(Json(into_responses(todos)))
}
