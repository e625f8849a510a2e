//! Pool and database configuration.
//!
//! `rwsql` does not read the environment itself; callers deserialize or
//! assemble these structs from whatever settings source they use and hand
//! them to [`Db::new`](crate::Db::new).

use serde::Deserialize;
use std::time::Duration;

/// Default slow-statement threshold for the advisory log side channel.
pub const DEFAULT_SLOW_QUERY_THRESHOLD: Duration = Duration::from_millis(20);

/// Connection settings for one pool kind.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Server hostname or IP
    pub host: String,
    /// Server TCP port
    pub port: u16,
    /// Username
    pub user: String,
    /// Password
    pub password: String,
    /// Database (schema) name
    pub database: String,
    /// Connection character set, applied via `SET NAMES`
    pub charset: String,
    /// Upper bound on live connections in the pool
    pub max_connections: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3306,
            user: "root".to_string(),
            password: String::new(),
            database: String::new(),
            charset: "utf8mb4".to_string(),
            max_connections: 10,
        }
    }
}

impl PoolConfig {
    /// Create a configuration for the given host and database with defaults
    /// for everything else.
    pub fn new(host: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            database: database.into(),
            ..Self::default()
        }
    }

    /// Set the server port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the username.
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    /// Set the password.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// Set the connection character set.
    pub fn charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = charset.into();
        self
    }

    /// Set the pool's connection bound.
    pub fn max_connections(mut self, max: usize) -> Self {
        self.max_connections = max;
        self
    }
}

/// Top-level configuration: one optional [`PoolConfig`] per pool kind.
///
/// The write pool is mandatory if any write-class operation will be used;
/// when no read pool is configured, read operations fall back to the write
/// pool.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    /// Write-oriented pool settings
    pub write: Option<PoolConfig>,
    /// Read-oriented pool settings
    pub read: Option<PoolConfig>,
    /// Statements slower than this are reported through the log side
    /// channel; never affects results.
    #[serde(skip, default = "default_slow_query_threshold")]
    pub slow_query_threshold: Duration,
}

fn default_slow_query_threshold() -> Duration {
    DEFAULT_SLOW_QUERY_THRESHOLD
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            write: None,
            read: None,
            slow_query_threshold: DEFAULT_SLOW_QUERY_THRESHOLD,
        }
    }
}

impl DbConfig {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the write pool settings.
    pub fn write(mut self, config: PoolConfig) -> Self {
        self.write = Some(config);
        self
    }

    /// Set the read pool settings.
    pub fn read(mut self, config: PoolConfig) -> Self {
        self.read = Some(config);
        self
    }

    /// Override the slow-statement threshold.
    pub fn slow_query_threshold(mut self, threshold: Duration) -> Self {
        self.slow_query_threshold = threshold;
        self
    }
}
