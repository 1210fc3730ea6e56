//! Redis-backed session store.

use std::time::Duration;

use async_trait::async_trait;
use bb8::{Pool, PooledConnection};
use bb8_redis::RedisConnectionManager;
use redis::{AsyncCommands, IntoConnectionInfo};
use tracing::{debug, error};

use crate::sessions::{SessionId, SessionRecord, SessionStore, SessionStoreError};

/// Connection settings for the session cache.
#[derive(Clone)]
pub struct RedisSettings {
    /// `redis://host:port/db` URL.
    pub url: String,

    /// Password applied on top of whatever the URL carries.
    pub password: Option<String>,
}

impl std::fmt::Debug for RedisSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisSettings")
            .field("url", &self.url)
            .field("password", &self.password.as_ref().map(|_| "**redacted**"))
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct RedisSessionStore {
    pool: Pool<RedisConnectionManager>,
}

impl RedisSessionStore {
    /// Build a connection pool for the session cache.
    ///
    /// # Errors
    ///
    /// Returns an error when the URL is invalid or the pool can't be built.
    pub async fn connect(settings: &RedisSettings) -> Result<Self, SessionStoreError> {
        let mut info = settings
            .url
            .as_str()
            .into_connection_info()
            .map_err(SessionStoreError::Connect)?;

        if let Some(password) = &settings.password {
            info.redis.password = Some(password.clone());
        }

        let manager = RedisConnectionManager::new(info).map_err(SessionStoreError::Connect)?;

        let pool = Pool::builder()
            .build(manager)
            .await
            .map_err(SessionStoreError::Connect)?;

        Ok(Self { pool })
    }

    async fn connection(
        &self,
    ) -> Result<PooledConnection<'_, RedisConnectionManager>, SessionStoreError> {
        self.pool.get().await.map_err(|e| {
            error!(error = %e, "failed to get session store connection");
            SessionStoreError::Pool(e)
        })
    }
}

fn ttl_seconds(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn get(&self, id: &SessionId) -> Result<Option<SessionRecord>, SessionStoreError> {
        let mut conn = self.connection().await?;

        let value: Option<String> = conn
            .get(id.store_key())
            .await
            .map_err(SessionStoreError::Command)?;

        match value {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn set(
        &self,
        id: &SessionId,
        record: &SessionRecord,
        ttl: Duration,
    ) -> Result<(), SessionStoreError> {
        let json = serde_json::to_string(record)?;

        let mut conn = self.connection().await?;

        let () = conn
            .set_ex(id.store_key(), json, ttl_seconds(ttl))
            .await
            .map_err(SessionStoreError::Command)?;

        Ok(())
    }

    async fn delete(&self, id: &SessionId) -> Result<(), SessionStoreError> {
        let mut conn = self.connection().await?;

        let removed: u64 = conn
            .del(id.store_key())
            .await
            .map_err(SessionStoreError::Command)?;

        debug!(removed, "deleted session");

        Ok(())
    }

    async fn replace(
        &self,
        previous: Option<SessionId>,
        id: &SessionId,
        record: &SessionRecord,
        ttl: Duration,
    ) -> Result<(), SessionStoreError> {
        let json = serde_json::to_string(record)?;

        let mut pipe = redis::pipe();

        pipe.atomic();

        if let Some(previous) = &previous {
            pipe.del(previous.store_key()).ignore();
        }

        pipe.set_ex(id.store_key(), json, ttl_seconds(ttl)).ignore();

        let mut conn = self.connection().await?;

        let () = pipe
            .query_async(&mut *conn)
            .await
            .map_err(SessionStoreError::Command)?;

        Ok(())
    }
}
