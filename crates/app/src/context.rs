//! App Context

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::{
    auth::{
        Argon2PasswordHasher, AuthService, JwtTokenIssuer, PgAuthService, SessionBinding,
        TokenSettings,
    },
    database::{self, Db},
    domain::{
        todos::{PgTodosService, TodosService},
        users::{PgUsersService, UsersService},
    },
    sessions::{RedisSessionStore, RedisSettings, SessionStoreError},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to apply database migrations")]
    Migrations(#[source] sqlx::migrate::MigrateError),

    #[error("failed to connect to session store")]
    SessionStore(#[source] SessionStoreError),
}

/// Everything the services need, resolved once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub redis: RedisSettings,
    pub tokens: TokenSettings,
}

#[derive(Clone)]
pub struct AppContext {
    pub auth: Arc<dyn AuthService>,
    pub users: Arc<dyn UsersService>,
    pub todos: Arc<dyn TodosService>,
}

impl AppContext {
    /// Connect to the database and session store, apply migrations and
    /// wire up the services.
    ///
    /// # Errors
    ///
    /// Returns an error when a backing store is unreachable or a migration
    /// fails.
    pub async fn from_config(config: &AppConfig) -> Result<Self, AppInitError> {
        let pool = database::connect(&config.database_url, config.max_connections)
            .await
            .map_err(AppInitError::Database)?;

        database::migrate(&pool)
            .await
            .map_err(AppInitError::Migrations)?;

        let sessions = RedisSessionStore::connect(&config.redis)
            .await
            .map_err(AppInitError::SessionStore)?;

        info!("connected to session store");

        let db = Db::new(pool);

        let binding = SessionBinding::new(
            Arc::new(sessions),
            Arc::new(JwtTokenIssuer::new(&config.tokens)),
        );

        Ok(Self {
            auth: Arc::new(PgAuthService::new(
                db.clone(),
                Arc::new(Argon2PasswordHasher::new()),
                binding,
            )),
            users: Arc::new(PgUsersService::new(db.clone())),
            todos: Arc::new(PgTodosService::new(db)),
        })
    }
}
