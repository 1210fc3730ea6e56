//! State

use std::sync::Arc;

use todo_app::context::AppContext;

use crate::auth::SessionCookie;

#[derive(Clone)]
pub(crate) struct State {
    pub(crate) app: AppContext,
    pub(crate) session_cookie: SessionCookie,
}

impl State {
    #[must_use]
    pub(crate) fn new(app: AppContext, session_cookie: SessionCookie) -> Self {
        Self {
            app,
            session_cookie,
        }
    }

    #[must_use]
    pub(crate) fn shared(app: AppContext, session_cookie: SessionCookie) -> Arc<Self> {
        Arc::new(Self::new(app, session_cookie))
    }
}
