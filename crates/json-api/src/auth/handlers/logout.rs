//! Logout Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{auth::into_status_error, extensions::*, messages::MessageResponse, state::State};

/// Logout Handler
///
/// Ends the current session. Tokens bound to it stop working immediately.
#[endpoint(
    tags("auth"),
    summary = "Log out",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Logged out"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid or expired token"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<MessageResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.session_id_or_401()?;

    state
        .app
        .auth
        .logout(session)
        .await
        .map_err(into_status_error)?;

    res.add_cookie(state.session_cookie.removal());

    Ok(Json(MessageResponse::new("Logged out")))
}
