/// Server configuration, resolved from the environment at startup.
///
/// The defaults below apply when a variable is missing or unparseable.
use std::env;

/// Default listening port (`PORT`).
pub const DEFAULT_PORT: u16 = 3000;

/// Default allowed cross-origin value (`CORS_ORIGIN`).
pub const DEFAULT_CORS_ORIGIN: &str = "*";

/// Default keep-alive heartbeat period in seconds (`HEARTBEAT_SECS`).
pub const DEFAULT_HEARTBEAT_SECS: u64 = 60;

/// Resolved process configuration, passed into the bootstrap as plain
/// values. The game core never reads the environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub cors_origin: String,
    pub heartbeat_secs: u64,
}

impl ServerConfig {
    /// Read the configuration from the environment, falling back to the
    /// defaults above.
    pub fn from_env() -> Self {
        Self {
            port: env_parsed("PORT").unwrap_or(DEFAULT_PORT),
            cors_origin: env::var("CORS_ORIGIN")
                .unwrap_or_else(|_| DEFAULT_CORS_ORIGIN.to_string()),
            heartbeat_secs: env_parsed("HEARTBEAT_SECS").unwrap_or(DEFAULT_HEARTBEAT_SECS),
        }
    }
}

fn env_parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}
