//! Server configuration parsed from environment variables.

use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_LONG_POLL_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CORS_ALLOWED_ORIGINS: &str = "*";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    /// Upper bound on a single long-poll request before it answers "no change".
    pub long_poll_timeout: Duration,
    /// `*` or a comma-separated list of origins.
    pub cors_allowed_origins: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            long_poll_timeout: Duration::from_secs(DEFAULT_LONG_POLL_TIMEOUT_SECS),
            cors_allowed_origins: DEFAULT_CORS_ALLOWED_ORIGINS.to_owned(),
        }
    }
}

impl ServerConfig {
    /// Build config from environment variables. Missing or unparsable values
    /// fall back to their defaults.
    ///
    /// Optional:
    /// - `PORT`: default 8080
    /// - `LONG_POLL_TIMEOUT_SECS`: default 30, minimum 1
    /// - `CORS_ALLOWED_ORIGINS`: default `*`
    #[must_use]
    pub fn from_env() -> Self {
        let long_poll_secs = env_parse("LONG_POLL_TIMEOUT_SECS", DEFAULT_LONG_POLL_TIMEOUT_SECS).max(1);
        Self {
            port: env_parse("PORT", DEFAULT_PORT),
            long_poll_timeout: Duration::from_secs(long_poll_secs),
            cors_allowed_origins: std::env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| DEFAULT_CORS_ALLOWED_ORIGINS.to_owned()),
        }
    }

    #[must_use]
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
