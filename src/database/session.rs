//! Scoped database sessions.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::Connection;
use tracing::{debug, warn};

use crate::error::DbError;
use crate::metrics;

/// A unit of database work.
///
/// The connection is opened on first use with a single attempt, and closed
/// when the session is dropped, including while unwinding.
#[derive(Debug)]
pub struct Session {
    options: Arc<MySqlConnectOptions>,
    conn: Option<MySqlConnection>,
    open_sessions: Arc<AtomicUsize>,
}

impl Session {
    pub(crate) fn new(options: Arc<MySqlConnectOptions>, open_sessions: Arc<AtomicUsize>) -> Self {
        Self {
            options,
            conn: None,
            open_sessions,
        }
    }

    /// Whether a connection is currently held.
    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    /// Borrow the session's connection, opening one if needed.
    pub async fn connection(&mut self) -> Result<&mut MySqlConnection, DbError> {
        let conn = match self.conn.take() {
            Some(conn) => conn,
            None => {
                let conn = MySqlConnection::connect_with(&self.options)
                    .await
                    .map_err(DbError::Connection)?;
                metrics::inc_sessions_opened();
                debug!("Database connection opened");
                conn
            }
        };
        Ok(self.conn.insert(conn))
    }

    /// Round-trip to the server.
    pub async fn ping(&mut self) -> Result<(), DbError> {
        let conn = self.connection().await?;
        conn.ping().await.map_err(DbError::Connection)
    }

    /// Execute a statement and return the affected row count.
    pub async fn execute(&mut self, sql: &str) -> Result<u64, DbError> {
        let conn = self.connection().await?;
        let result = sqlx::query(sql).execute(&mut *conn).await?;
        Ok(result.rows_affected())
    }

    /// Release the session now.
    pub fn close(self) {}
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            // graceful close needs a runtime; otherwise the socket is just dropped
            if let Ok(handle) = tokio::runtime::Handle::try_current() {
                handle.spawn(async move {
                    if let Err(e) = conn.close().await {
                        warn!("Database connection close failed: {}", e);
                    }
                });
            }
            debug!("Database connection released");
        }
        self.open_sessions.fetch_sub(1, Ordering::SeqCst);
    }
}
