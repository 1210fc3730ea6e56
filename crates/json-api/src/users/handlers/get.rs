//! Get Current User Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    extensions::*,
    state::State,
    users::{errors::into_status_error, models::UserResponse},
};

/// Get Current User Handler
#[endpoint(
    tags("users"),
    summary = "Get current user",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Profile of the authenticated user"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid or expired token"),
        (status_code = StatusCode::NOT_FOUND, description = "Resource not found"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<UserResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let user = state
        .app
        .users
        .get_user(user)
        .await
        .map_err(into_status_error)?;

    Ok(Json(user.into()))
}
