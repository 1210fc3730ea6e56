//! Session store errors.

use bb8::RunError;
use redis::RedisError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("failed to open session store")]
    Connect(#[source] RedisError),

    #[error("failed to get session store connection")]
    Pool(#[from] RunError<RedisError>),

    #[error("session store command failed")]
    Command(#[source] RedisError),

    #[error("failed to encode session record")]
    Encoding(#[from] serde_json::Error),
}
