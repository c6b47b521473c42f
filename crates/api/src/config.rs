use regatta_core::pricing::{validate_fee_percent, DEFAULT_PLATFORM_FEE_PERCENT};

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Base URL of the public web app; shared strategy links point here.
    pub public_web_url: String,
    /// Quiet period before a notes draft is written (default: `1500`).
    pub notes_autosave_debounce_ms: u64,
    /// Platform fee taken from coach rates, in percent (default: `15`).
    pub platform_fee_percent: f64,
    /// JWT token configuration.
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                 |
    /// |------------------------------|-------------------------|
    /// | `HOST`                       | `0.0.0.0`               |
    /// | `PORT`                       | `3000`                  |
    /// | `CORS_ORIGINS`               | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`       | `30`                    |
    /// | `PUBLIC_WEB_URL`             | `http://localhost:5173` |
    /// | `NOTES_AUTOSAVE_DEBOUNCE_MS` | `1500`                  |
    /// | `PLATFORM_FEE_PERCENT`       | `15`                    |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let public_web_url = std::env::var("PUBLIC_WEB_URL")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .trim_end_matches('/')
            .to_string();

        let notes_autosave_debounce_ms: u64 = std::env::var("NOTES_AUTOSAVE_DEBOUNCE_MS")
            .unwrap_or_else(|_| "1500".into())
            .parse()
            .expect("NOTES_AUTOSAVE_DEBOUNCE_MS must be a valid u64");

        let platform_fee_percent: f64 = std::env::var("PLATFORM_FEE_PERCENT")
            .unwrap_or_else(|_| DEFAULT_PLATFORM_FEE_PERCENT.to_string())
            .parse()
            .expect("PLATFORM_FEE_PERCENT must be a number");
        if let Err(msg) = validate_fee_percent(platform_fee_percent) {
            panic!("PLATFORM_FEE_PERCENT: {msg}");
        }

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            public_web_url,
            notes_autosave_debounce_ms,
            platform_fee_percent,
            jwt,
        }
    }
}
