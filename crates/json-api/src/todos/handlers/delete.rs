//! Delete Todo Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};

use todo_app::todos::records::TodoId;

use crate::{
    extensions::*, messages::MessageResponse, state::State, todos::errors::into_status_error,
};

/// Delete Todo Handler
#[endpoint(
    tags("todos"),
    summary = "Delete Todo",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Todo deleted"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid request"),
        (status_code = StatusCode::NOT_FOUND, description = "Resource not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    id: PathParam<i64>,
    depot: &mut Depot,
) -> Result<Json<MessageResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    state
        .app
        .todos
        .delete_todo(user, TodoId::new(id.into_inner()))
        .await
        .map_err(into_status_error)?;

    Ok(Json(MessageResponse::new("Todo deleted")))
}
