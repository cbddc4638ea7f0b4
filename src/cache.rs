//! Redis connection factory and connectivity self-test.

use std::time::Duration;

use redis::{Client, ConnectionAddr, ConnectionInfo, RedisConnectionInfo};
use tracing::{debug, instrument};

use crate::config::Config;
use crate::error::CacheError;
use crate::metrics;

/// Upper bound for a single connectivity probe.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Shared Redis client handle.
///
/// Building the handle never opens a socket; connections are made by the
/// operations that need them.
#[derive(Debug, Clone)]
pub struct CacheClient {
    client: Client,
    addr: String,
    probe_timeout: Duration,
}

impl CacheClient {
    /// Build the client from configuration.
    pub fn new(config: &Config) -> Result<Self, CacheError> {
        let port: u16 = config
            .redis_port
            .trim()
            .parse()
            .map_err(|_| CacheError::InvalidSetting {
                name: "REDIS_PORT",
                value: config.redis_port.clone(),
            })?;

        let password = if config.redis_password.is_empty() {
            None
        } else {
            Some(config.redis_password.clone())
        };

        let info = ConnectionInfo {
            addr: ConnectionAddr::Tcp(config.redis_host.clone(), port),
            redis: RedisConnectionInfo {
                db: config.redis_db,
                password,
                ..Default::default()
            },
        };
        let client = Client::open(info).map_err(CacheError::Client)?;
        let addr = format!("{}:{}", config.redis_host, port);
        debug!(addr = %addr, db = config.redis_db, "Redis client created");

        Ok(Self {
            client,
            addr,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        })
    }

    /// Override the probe timeout.
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Get the shared client handle.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// `host:port` of the server.
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Send one `PING` and return the server's reply.
    #[instrument(skip(self), fields(addr = %self.addr))]
    pub async fn ping(&self) -> Result<String, CacheError> {
        let probe = async {
            let mut conn = self.client.get_multiplexed_async_connection().await?;
            let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
            Ok::<_, redis::RedisError>(pong)
        };

        let result = match tokio::time::timeout(self.probe_timeout, probe).await {
            Ok(Ok(pong)) => Ok(pong),
            Ok(Err(e)) => Err(CacheError::Connection(e)),
            Err(_) => Err(CacheError::Timeout(self.probe_timeout)),
        };

        metrics::record_cache_probe(result.is_ok());
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builds_from_defaults_without_connecting() {
        let cache = CacheClient::new(&Config::default()).unwrap();

        assert_eq!(cache.addr(), "localhost:6379");
        let info = cache.client().get_connection_info();
        assert_eq!(info.redis.db, 0);
        assert!(info.redis.password.is_none());
    }

    #[test]
    fn password_and_db_are_applied() {
        let config = Config::from_vars([
            ("REDIS_HOST", "cache.internal"),
            ("REDIS_PORT", "6380"),
            ("REDIS_PASSWORD", "secret"),
            ("REDIS_DB", "2"),
        ])
        .unwrap();

        let cache = CacheClient::new(&config).unwrap();
        let info = cache.client().get_connection_info();

        assert_eq!(cache.addr(), "cache.internal:6380");
        assert_eq!(info.redis.db, 2);
        assert_eq!(info.redis.password.as_deref(), Some("secret"));
    }

    #[test]
    fn malformed_port_is_rejected() {
        let config = Config::from_vars([("REDIS_PORT", "redis")]).unwrap();

        let err = CacheClient::new(&config).unwrap_err();
        assert!(matches!(err, CacheError::InvalidSetting { name: "REDIS_PORT", .. }));
    }

    #[test]
    fn probe_timeout_can_be_overridden() {
        let cache = CacheClient::new(&Config::default())
            .unwrap()
            .with_probe_timeout(Duration::from_millis(50));

        assert_eq!(cache.probe_timeout, Duration::from_millis(50));
    }
}
