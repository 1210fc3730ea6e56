//! Test helpers.

use std::{
    sync::{Arc, LazyLock},
    time::Duration,
};

use jiff::Timestamp;
use rust_decimal::Decimal;
use salvo::{affix_state::inject, http::header::SET_COOKIE, prelude::*};
use uuid::Uuid;

use todo_app::{
    auth::MockAuthService,
    context::AppContext,
    sessions::SessionId,
    todos::{
        MockTodosService,
        records::{TodoId, TodoRecord},
    },
    users::{
        MockUsersService,
        records::{UserRecord, UserUuid},
    },
};

use crate::{auth::SessionCookie, extensions::*, state::State};

pub(crate) const TEST_USER_UUID: UserUuid = UserUuid::from_uuid(Uuid::nil());

pub(crate) const SESSION_COOKIE_NAME: &str = "todo_session";

pub(crate) static TEST_SESSION_ID: LazyLock<SessionId> = LazyLock::new(SessionId::generate);

/// Service doubles backing the app context. Any call without a matching
/// expectation fails the test.
#[derive(Default)]
pub(crate) struct Mocks {
    pub(crate) auth: MockAuthService,
    pub(crate) users: MockUsersService,
    pub(crate) todos: MockTodosService,
}

impl Mocks {
    pub(crate) fn with_auth(auth: MockAuthService) -> Self {
        Self {
            auth,
            ..Self::default()
        }
    }

    pub(crate) fn with_todos(todos: MockTodosService) -> Self {
        Self {
            todos,
            ..Self::default()
        }
    }

    pub(crate) fn into_state(self) -> Arc<State> {
        State::shared(
            AppContext {
                auth: Arc::new(self.auth),
                users: Arc::new(self.users),
                todos: Arc::new(self.todos),
            },
            session_cookie(),
        )
    }
}

pub(crate) fn session_cookie() -> SessionCookie {
    SessionCookie::new(SESSION_COOKIE_NAME, false, Duration::from_secs(3600))
}

/// Stands in for the auth middleware.
#[salvo::handler]
pub(crate) async fn inject_identity(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_user_uuid(TEST_USER_UUID);
    depot.insert_session_id(TEST_SESSION_ID.clone());
    ctrl.call_next(req, depot, res).await;
}

/// Route behind a stubbed, already authenticated identity.
pub(crate) fn authenticated_service(mocks: Mocks, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(mocks.into_state()))
            .hoop(inject_identity)
            .push(route),
    )
}

/// Route reachable without authentication.
pub(crate) fn public_service(mocks: Mocks, route: Router) -> Service {
    Service::new(Router::new().hoop(inject(mocks.into_state())).push(route))
}

pub(crate) fn make_todo(id: i64, description: &str, position: i64) -> TodoRecord {
    TodoRecord {
        id: TodoId::new(id),
        description: description.to_string(),
        position: Decimal::from(position),
        completed: false,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_user(username: Option<&str>) -> UserRecord {
    UserRecord {
        uuid: TEST_USER_UUID,
        email: "test@example.com".to_string(),
        username: username.map(str::to_string),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

/// The session cookie set on `res`, rendered as a `Set-Cookie` value.
pub(crate) fn issued_session_cookie(res: &Response) -> String {
    res.cookie(SESSION_COOKIE_NAME)
        .map(ToString::to_string)
        .or_else(|| {
            res.headers()
                .get_all(SET_COOKIE)
                .iter()
                .filter_map(|value| value.to_str().ok())
                .find(|value| value.starts_with(SESSION_COOKIE_NAME))
                .map(str::to_owned)
        })
        .unwrap_or_default()
}
