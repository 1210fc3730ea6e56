//! Login Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};

use crate::{
    auth::{
        into_status_error,
        models::{CredentialsRequest, LoginResponse},
    },
    extensions::*,
    state::State,
};

/// Login Handler
///
/// Opens a session and returns a bearer token bound to it. The session id is
/// set as an `HttpOnly` cookie; a session the client already held is retired.
#[endpoint(
    tags("auth"),
    summary = "Log in",
    responses(
        (status_code = StatusCode::OK, description = "Logged in"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid request"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid email or password"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "auth.login", skip_all, fields(user_uuid = tracing::field::Empty), err)]
pub(crate) async fn handler(
    json: JsonBody<CredentialsRequest>,
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<LoginResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let credentials = json.into_inner().into_credentials()?;
    let previous = state.session_cookie.read(req);

    let login = state
        .app
        .auth
        .login(credentials, previous)
        .await
        .map_err(into_status_error)?;

    tracing::Span::current().record("user_uuid", tracing::field::display(login.user_uuid));

    res.add_cookie(state.session_cookie.issue(&login.session_id));

    Ok(Json(LoginResponse {
        user_id: login.user_uuid.into_uuid(),
        access_token: login.access_token,
    }))
}
