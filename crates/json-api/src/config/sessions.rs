//! Session Config

use clap::Args;

/// Session store and session cookie settings.
#[derive(Debug, Args)]
pub struct SessionConfig {
    /// Redis connection string
    #[arg(long, env = "REDIS_URL")]
    pub redis_url: String,

    /// Redis password, if the server requires one
    #[arg(long, env = "REDIS_PASSWORD", hide_env_values = true)]
    pub redis_password: Option<String>,

    /// Name of the cookie carrying the session id
    #[arg(long, env = "SESSION_COOKIE_NAME", default_value = "todo_session")]
    pub cookie_name: String,

    /// Only send the session cookie over HTTPS
    #[arg(long, env = "SESSION_COOKIE_SECURE", default_value_t = false)]
    pub cookie_secure: bool,
}
