//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};

use todo_app::{sessions::SessionId, users::records::UserUuid};

/// Helpers for reading request-scoped values and mapping failures to HTTP
/// errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    /// Record the user resolved by the auth middleware.
    fn insert_user_uuid(&mut self, user: UserUuid);

    fn user_uuid_or_401(&self) -> Result<UserUuid, StatusError>;

    /// Record the session the request was authenticated with.
    fn insert_session_id(&mut self, session: SessionId);

    fn session_id_or_401(&self) -> Result<SessionId, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_user_uuid(&mut self, user: UserUuid) {
        self.inject(user);
    }

    fn user_uuid_or_401(&self) -> Result<UserUuid, StatusError> {
        self.obtain::<UserUuid>()
            .copied()
            .map_err(|_ignored| StatusError::unauthorized())
    }

    fn insert_session_id(&mut self, session: SessionId) {
        self.inject(session);
    }

    fn session_id_or_401(&self) -> Result<SessionId, StatusError> {
        self.obtain::<SessionId>()
            .cloned()
            .map_err(|_ignored| StatusError::unauthorized())
    }
}
