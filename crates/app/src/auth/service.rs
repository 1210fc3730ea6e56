//! Auth service.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use mockall::automock;
use tokio::{sync::OnceCell, task};
use tracing::info;

use crate::{
    auth::{AuthServiceError, Credentials, Login, PasswordHasher, SessionBinding},
    database::Db,
    domain::users::{
        data::NewUser,
        records::{UserRecord, UserUuid},
        repository::PgUsersRepository,
    },
    sessions::SessionId,
};

#[derive(Clone)]
pub struct PgAuthService {
    db: Db,
    users: PgUsersRepository,
    hasher: Arc<dyn PasswordHasher>,
    binding: SessionBinding,
    /// Hash checked on unknown-email logins so they cost the same as real ones.
    decoy_hash: Arc<OnceCell<String>>,
}

/// Password behind [`PgAuthService`]'s decoy hash. Never stored.
const DECOY_PASSWORD: &str = "decoy-password-never-matches";

impl fmt::Debug for PgAuthService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgAuthService")
            .field("db", &self.db)
            .field("binding", &self.binding)
            .finish_non_exhaustive()
    }
}

impl PgAuthService {
    #[must_use]
    pub fn new(db: Db, hasher: Arc<dyn PasswordHasher>, binding: SessionBinding) -> Self {
        Self {
            db,
            users: PgUsersRepository::new(),
            hasher,
            binding,
            decoy_hash: Arc::new(OnceCell::new()),
        }
    }

    async fn decoy_hash(&self) -> Result<String, AuthServiceError> {
        let hash = self
            .decoy_hash
            .get_or_try_init(|| async {
                let hasher = Arc::clone(&self.hasher);

                let hash = task::spawn_blocking(move || hasher.hash(DECOY_PASSWORD)).await??;

                Ok::<_, AuthServiceError>(hash)
            })
            .await?;

        Ok(hash.clone())
    }

    async fn hash_password(&self, credentials: &Credentials) -> Result<String, AuthServiceError> {
        let hasher = Arc::clone(&self.hasher);
        let password = credentials.password.clone();

        let hash = task::spawn_blocking(move || hasher.hash(&password)).await??;

        Ok(hash)
    }

    async fn verify_password(
        &self,
        hash: String,
        credentials: &Credentials,
    ) -> Result<bool, AuthServiceError> {
        let hasher = Arc::clone(&self.hasher);
        let password = credentials.password.clone();

        let valid = task::spawn_blocking(move || hasher.verify(&hash, &password)).await??;

        Ok(valid)
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    #[tracing::instrument(name = "auth.service.register", skip_all, err)]
    async fn register(&self, credentials: Credentials) -> Result<UserRecord, AuthServiceError> {
        let password_hash = self.hash_password(&credentials).await?;

        let mut tx = self.db.begin().await?;

        let created = self
            .users
            .create_user(
                &mut tx,
                NewUser {
                    uuid: UserUuid::new(),
                    email: credentials.email,
                    password_hash,
                },
            )
            .await?;

        tx.commit().await?;

        info!(user_uuid = %created.record.uuid, "registered user");

        Ok(created.record)
    }

    #[tracing::instrument(name = "auth.service.login", skip_all, err)]
    async fn login(
        &self,
        credentials: Credentials,
        previous: Option<SessionId>,
    ) -> Result<Login, AuthServiceError> {
        let mut tx = self.db.begin().await?;

        let stored = self
            .users
            .get_user_by_email(&mut tx, &credentials.email)
            .await?;

        tx.commit().await?;

        let Some(stored) = stored else {
            let decoy = self.decoy_hash().await?;

            let _matched = self.verify_password(decoy, &credentials).await?;

            return Err(AuthServiceError::InvalidCredentials);
        };

        if !self
            .verify_password(stored.password_hash, &credentials)
            .await?
        {
            return Err(AuthServiceError::InvalidCredentials);
        }

        let user_uuid = stored.record.uuid;

        let bound = self.binding.bind(user_uuid, previous).await?;

        info!(%user_uuid, "user logged in");

        Ok(Login {
            user_uuid,
            session_id: bound.session_id,
            access_token: bound.access_token,
        })
    }

    async fn logout(&self, session: SessionId) -> Result<(), AuthServiceError> {
        self.binding.terminate(&session).await?;

        Ok(())
    }

    async fn authenticate(
        &self,
        token: &str,
        session: Option<SessionId>,
    ) -> Result<UserUuid, AuthServiceError> {
        Ok(self.binding.verify(token, session.as_ref()).await?)
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create a user with a hashed password.
    async fn register(&self, credentials: Credentials) -> Result<UserRecord, AuthServiceError>;

    /// Check credentials and open a new session, retiring `previous`.
    async fn login(
        &self,
        credentials: Credentials,
        previous: Option<SessionId>,
    ) -> Result<Login, AuthServiceError>;

    /// End a session so its tokens stop authenticating.
    async fn logout(&self, session: SessionId) -> Result<(), AuthServiceError>;

    /// Resolve a bearer token plus session cookie to the authenticated user.
    async fn authenticate(
        &self,
        token: &str,
        session: Option<SessionId>,
    ) -> Result<UserUuid, AuthServiceError>;
}
