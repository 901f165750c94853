//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::stream::StreamConfig;

/// Root configuration for the failover coordinator.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct FailoverConfig {
    /// Control API settings (bind address, shared secret).
    pub api: ApiConfig,

    /// PgBouncer admin console settings.
    pub pooler: PoolerConfig,

    /// Change stream settings.
    pub stream: StreamSettings,
}

/// Control API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Bind address (e.g., "127.0.0.1:8443").
    pub bind_address: String,

    /// Shared secret required as a bearer token on every request. Empty
    /// disables authentication.
    pub auth_token: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8443".to_string(),
            auth_token: String::new(),
        }
    }
}

/// PgBouncer admin console configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PoolerConfig {
    /// Admin console host.
    pub host: String,

    /// Admin console port.
    pub port: u16,

    /// Admin user.
    pub user: String,

    /// Admin password. Empty means trust/peer auth.
    pub password: String,

    /// Admin database name.
    pub database: String,

    /// Deadline for acquiring an admin connection, in milliseconds.
    pub connect_timeout_ms: u64,

    /// Deadline for explicit resume and the liveness probe, in
    /// milliseconds.
    pub exec_timeout_ms: u64,
}

impl Default for PoolerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 6432,
            user: "pgbouncer".to_string(),
            password: String::new(),
            database: "pgbouncer".to_string(),
            connect_timeout_ms: 1_000,
            exec_timeout_ms: 5_000,
        }
    }
}

/// Change stream configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StreamSettings {
    /// Store keys tracked by the stream.
    pub keys: Vec<String>,

    /// Interval between full poll passes, in milliseconds.
    pub poll_interval_ms: u64,

    /// Delay before reopening a lost watch subscription, in milliseconds.
    pub watch_retry_interval_ms: u64,

    /// Per-key deadline for poll lookups, in milliseconds.
    pub get_timeout_ms: u64,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            keys: Vec::new(),
            poll_interval_ms: 15_000,
            watch_retry_interval_ms: 5_000,
            get_timeout_ms: 2_000,
        }
    }
}

impl StreamSettings {
    /// Convert to the stream's runtime configuration.
    pub fn to_stream_config(&self) -> StreamConfig {
        StreamConfig {
            keys: self.keys.clone(),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            watch_retry_interval: Duration::from_millis(self.watch_retry_interval_ms),
            get_timeout: Duration::from_millis(self.get_timeout_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_settings_convert_to_runtime_config() {
        let settings = StreamSettings {
            keys: vec!["/service/master".to_string()],
            poll_interval_ms: 250,
            watch_retry_interval_ms: 100,
            get_timeout_ms: 50,
        };

        let config = settings.to_stream_config();
        assert_eq!(config.keys, settings.keys);
        assert_eq!(config.poll_interval, Duration::from_millis(250));
        assert_eq!(config.watch_retry_interval, Duration::from_millis(100));
        assert_eq!(config.get_timeout, Duration::from_millis(50));
    }
}
