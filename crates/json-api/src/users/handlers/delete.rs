//! Delete Current User Handler

use std::sync::Arc;

use salvo::prelude::*;
use tracing::warn;

use crate::{
    extensions::*, messages::MessageResponse, state::State, users::errors::into_status_error,
};

/// Delete Current User Handler
///
/// Removes the account and all of its todos, then ends the session.
#[endpoint(
    tags("users"),
    summary = "Delete current user",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "User deleted"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid or expired token"),
        (status_code = StatusCode::NOT_FOUND, description = "Resource not found"),
    ),
)]
pub(crate) async fn handler(
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<MessageResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;
    let session = depot.session_id_or_401()?;

    state
        .app
        .users
        .delete_user(user)
        .await
        .map_err(into_status_error)?;

    // The account is gone either way; a lingering session expires with its TTL.
    if let Err(error) = state.app.auth.logout(session).await {
        warn!(user_uuid = %user, "failed to end session of deleted user: {error}");
    }

    res.add_cookie(state.session_cookie.removal());

    Ok(Json(MessageResponse::new("User deleted")))
}
