//! Token Config

use clap::Args;

/// Access token settings.
#[derive(Debug, Args)]
pub struct TokenConfig {
    /// HMAC secret used to sign access tokens
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    /// Access token lifetime in hours
    #[arg(
        long = "jwt-access-token-exp-hour",
        env = "JWT_ACCESS_TOKEN_EXP_HOUR",
        default_value_t = 24_u64
    )]
    pub access_token_exp_hours: u64,
}
