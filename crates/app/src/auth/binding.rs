//! Token to session binding.
//!
//! An access token only authenticates while the session it names is alive
//! in the session store and still belongs to the token's subject. Deleting
//! the session record therefore revokes every token minted for it.

use std::{fmt, sync::Arc};

use jiff::Timestamp;
use thiserror::Error;
use tracing::debug;

use crate::{
    auth::token::{TokenError, TokenIssuer},
    domain::users::records::UserUuid,
    sessions::{SessionId, SessionRecord, SessionStore, SessionStoreError},
};

#[derive(Debug, Error)]
pub enum BindingError {
    #[error("token rejected")]
    Token(#[from] TokenError),

    #[error("no live session")]
    NoSession,

    #[error("token does not match session")]
    Mismatch,

    #[error("session store error")]
    Store(#[from] SessionStoreError),
}

/// A freshly bound session and the token that refers to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundSession {
    pub session_id: SessionId,
    pub access_token: String,
}

#[derive(Clone)]
pub struct SessionBinding {
    sessions: Arc<dyn SessionStore>,
    tokens: Arc<dyn TokenIssuer>,
}

impl fmt::Debug for SessionBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionBinding").finish_non_exhaustive()
    }
}

impl SessionBinding {
    #[must_use]
    pub fn new(sessions: Arc<dyn SessionStore>, tokens: Arc<dyn TokenIssuer>) -> Self {
        Self { sessions, tokens }
    }

    /// Start a session for `user`, retiring `previous` if the client still
    /// held one. The old record is removed and the new one written in a
    /// single store operation; on failure neither change is visible.
    ///
    /// # Errors
    ///
    /// Returns an error if signing fails or the session can't be saved.
    pub async fn bind(
        &self,
        user: UserUuid,
        previous: Option<SessionId>,
    ) -> Result<BoundSession, BindingError> {
        let session_id = SessionId::generate();

        let access_token = self.tokens.mint(user, &session_id)?;

        let record = SessionRecord {
            user_uuid: user.into_uuid(),
            created_at: Timestamp::now(),
        };

        self.sessions
            .replace(previous, &session_id, &record, self.tokens.lifetime())
            .await?;

        Ok(BoundSession {
            session_id,
            access_token,
        })
    }

    /// Resolve the user behind `token`, presented together with `session`.
    ///
    /// # Errors
    ///
    /// Fails when the token is invalid or expired, when no session was
    /// presented or it is no longer live, when the token names a different
    /// session, or when the session belongs to a different user.
    pub async fn verify(
        &self,
        token: &str,
        session: Option<&SessionId>,
    ) -> Result<UserUuid, BindingError> {
        let claims = self.tokens.validate(token)?;

        let session = session.ok_or(BindingError::NoSession)?;

        if claims.sid != session.as_str() {
            debug!("token names a different session");
            return Err(BindingError::Mismatch);
        }

        let record = self
            .sessions
            .get(session)
            .await?
            .ok_or(BindingError::NoSession)?;

        if record.user_uuid != claims.sub {
            debug!("session is bound to a different user");
            return Err(BindingError::Mismatch);
        }

        Ok(UserUuid::from_uuid(claims.sub))
    }

    /// End `session`. Tokens minted for it stop verifying immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store can't be updated.
    pub async fn terminate(&self, session: &SessionId) -> Result<(), BindingError> {
        self.sessions.delete(session).await?;

        Ok(())
    }
}
