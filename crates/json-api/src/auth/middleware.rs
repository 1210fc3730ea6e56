//! Auth middleware.
//!
//! A request is authenticated only when its bearer token verifies and names
//! the live session carried by the session cookie.

use std::sync::Arc;

use salvo::{http::header::AUTHORIZATION, prelude::*};

use todo_app::{auth::AuthServiceError, sessions::SessionId};

use crate::{
    auth::{UNAUTHENTICATED_BRIEF, into_status_error},
    extensions::*,
    observability::{AuthRejection, record_auth_rejection},
    state::State,
};

#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let Some(token) = extract_bearer_token(req) else {
        record_auth_rejection(AuthRejection::MissingToken);
        res.render(StatusError::unauthorized().brief(UNAUTHENTICATED_BRIEF));

        return;
    };

    let state = match depot.obtain::<Arc<State>>() {
        Ok(state) => Arc::clone(state),
        Err(_error) => {
            res.render(StatusError::internal_server_error());

            return;
        }
    };

    let session = state.session_cookie.read(req);

    let user = match state.app.auth.authenticate(token, session.clone()).await {
        Ok(user) => user,
        Err(error) => {
            if matches!(error, AuthServiceError::Unauthenticated) {
                record_auth_rejection(rejection_reason(session.as_ref()));
            }

            res.render(into_status_error(error));

            return;
        }
    };

    depot.insert_user_uuid(user);

    if let Some(session) = session {
        depot.insert_session_id(session);
    }

    ctrl.call_next(req, depot, res).await;
}

fn rejection_reason(session: Option<&SessionId>) -> AuthRejection {
    match session {
        Some(_) => AuthRejection::Rejected,
        None => AuthRejection::MissingSession,
    }
}

fn extract_bearer_token(req: &Request) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }

    Some(token)
}
