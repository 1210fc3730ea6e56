//! CORS Config

use clap::Args;

/// Cross-origin settings.
#[derive(Debug, Args)]
pub struct CorsConfig {
    /// Origin of the browser frontend allowed to call the API
    #[arg(long, env = "FRONTEND_URL")]
    pub frontend_url: String,
}
