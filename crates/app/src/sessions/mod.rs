//! Server-side sessions

mod errors;
mod id;
mod models;
mod redis_store;
mod store;

pub use errors::*;
pub use id::*;
pub use models::*;
pub use redis_store::{RedisSessionStore, RedisSettings};
pub use store::*;
