//! Configuration loading
//!
//! All settings come from environment variables with compiled defaults,
//! so the service starts with zero configuration in development.

use std::path::PathBuf;
use tracing::warn;

/// Runtime configuration for the HitNote services
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the SQLite database file
    pub db_path: PathBuf,
    /// HMAC secret for signing access tokens
    pub jwt_secret: String,
    /// Address the HTTP server binds to
    pub bind_addr: String,
    /// Base URL of the Genius metadata API
    pub genius_api_url: String,
    /// Bearer token for the Genius API (empty disables the search endpoint)
    pub genius_access_token: String,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// `HITNOTE_JWT_SECRET` has a compiled development fallback; production
    /// deployments are expected to set it explicitly.
    pub fn from_env() -> Self {
        Self {
            db_path: std::env::var("HITNOTE_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("bd_hitnote.db")),
            jwt_secret: std::env::var("HITNOTE_JWT_SECRET").unwrap_or_else(|_| {
                warn!("HITNOTE_JWT_SECRET not set, using the development secret");
                "hitnote-dev-secret".to_string()
            }),
            bind_addr: std::env::var("HITNOTE_BIND_ADDR")
                .unwrap_or_else(|_| "127.0.0.1:8000".to_string()),
            genius_api_url: std::env::var("GENIUS_API_URL")
                .unwrap_or_else(|_| "https://api.genius.com".to_string()),
            genius_access_token: std::env::var("GENIUS_ACCESS_TOKEN").unwrap_or_default(),
        }
    }
}
