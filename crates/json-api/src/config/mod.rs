//! Server configuration module

use clap::Parser;

use todo_app::{
    auth::{SigningSecret, TokenSettings},
    context::AppConfig,
    sessions::RedisSettings,
};

use crate::config::{
    cors::CorsConfig, db::DatabaseConfig, observability::LoggingConfig,
    server::ServerRuntimeConfig, sessions::SessionConfig, tokens::TokenConfig,
};

pub(crate) mod cors;
pub(crate) mod db;
pub(crate) mod observability;
pub(crate) mod server;
pub(crate) mod sessions;
pub(crate) mod tokens;

/// Todo JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "todo-json", about = "Todo JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Session store and cookie settings.
    #[command(flatten)]
    pub sessions: SessionConfig,

    /// Access token settings.
    #[command(flatten)]
    pub tokens: TokenConfig,

    /// Cross-origin settings.
    #[command(flatten)]
    pub cors: CorsConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }

    /// Settings handed to the application services.
    #[must_use]
    pub fn app_config(&self) -> AppConfig {
        AppConfig {
            database_url: self.database.database_url.clone(),
            max_connections: self.database.database_max_connections,
            redis: RedisSettings {
                url: self.sessions.redis_url.clone(),
                password: self.sessions.redis_password.clone(),
            },
            tokens: TokenSettings {
                secret: SigningSecret::new(self.tokens.jwt_secret.as_bytes()),
                lifetime_hours: self.tokens.access_token_exp_hours,
            },
        }
    }
}
