//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::time::Duration;

/// Shortest allowed pause between expiry sweeps.
pub const MIN_CLEANUP_INTERVAL: Duration = Duration::from_secs(1);

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// TTL in seconds for cached page fetches
    pub page_ttl: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Background expiry sweep interval in seconds
    pub cleanup_interval: u64,
    /// Timeout in seconds for outgoing page requests
    pub fetch_timeout: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `PAGE_TTL` - Cached page lifetime in seconds (default: 10)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Expiry sweep frequency in seconds (default: 1, minimum: 1)
    /// - `FETCH_TIMEOUT` - Page request timeout in seconds (default: 5)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            page_ttl: parse_var("PAGE_TTL").unwrap_or(defaults.page_ttl),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            cleanup_interval: parse_var::<u64>("CLEANUP_INTERVAL")
                .unwrap_or(defaults.cleanup_interval)
                .max(MIN_CLEANUP_INTERVAL.as_secs()),
            fetch_timeout: parse_var("FETCH_TIMEOUT").unwrap_or(defaults.fetch_timeout),
        }
    }

    pub fn page_ttl(&self) -> Duration {
        Duration::from_secs(self.page_ttl)
    }

    /// Pause between expiry sweeps, never below [`MIN_CLEANUP_INTERVAL`].
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval).max(MIN_CLEANUP_INTERVAL)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_ttl: 10,
            server_port: 3000,
            cleanup_interval: 1,
            fetch_timeout: 5,
        }
    }
}
