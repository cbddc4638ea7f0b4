//! MySQL connection factory.
//!
//! This module handles:
//! - Connection URL composition from the configuration snapshot
//! - A shared connection factory (no I/O until a session is used)
//! - The schema registry and table materialization
//! - Scoped session acquisition

pub mod schema;
pub mod session;

use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::future::BoxFuture;
use sqlx::mysql::MySqlConnectOptions;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::DbError;

pub use schema::{Schema, TableDef};
pub use session::Session;

/// Compose the MySQL connection URL from configuration.
pub fn connection_url(config: &Config) -> String {
    format!(
        "mysql://{}:{}@{}:{}/{}?charset={}",
        config.mysql_username,
        config.mysql_password,
        config.mysql_host,
        config.mysql_port,
        config.mysql_dbname,
        config.mysql_charset,
    )
}

/// Shared database handle: connect options plus schema registry.
#[derive(Debug, Clone)]
pub struct Database {
    options: Arc<MySqlConnectOptions>,
    schema: Arc<Schema>,
    open_sessions: Arc<AtomicUsize>,
}

impl Database {
    /// Build the handle with an empty schema registry.
    pub fn new(config: &Config) -> Result<Self, DbError> {
        Self::with_schema(config, Schema::new())
    }

    /// Build the handle bound to the given schema registry.
    ///
    /// Only parses the connection URL; a connection is opened when a session
    /// is first used.
    pub fn with_schema(config: &Config, schema: Schema) -> Result<Self, DbError> {
        let options =
            MySqlConnectOptions::from_str(&connection_url(config)).map_err(DbError::InvalidUrl)?;

        debug!(
            host = %config.mysql_host,
            port = %config.mysql_port,
            database = %config.mysql_dbname,
            tables = schema.len(),
            "Database engine created"
        );

        Ok(Self {
            options: Arc::new(options),
            schema: Arc::new(schema),
            open_sessions: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Get the parsed connect options.
    pub fn options(&self) -> &MySqlConnectOptions {
        &self.options
    }

    /// Get the schema registry.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Issue `CREATE TABLE IF NOT EXISTS` for every registered table.
    ///
    /// An empty registry does not open a connection.
    pub async fn create_tables(&self) -> Result<usize, DbError> {
        if self.schema.is_empty() {
            debug!("No tables registered");
            return Ok(0);
        }

        let mut session = self.session();
        let created = self.schema.create_all(session.connection().await?).await?;
        session.close();
        info!(tables = created, "Database tables checked/created");
        Ok(created)
    }

    /// Open a new session. It is released when dropped.
    pub fn session(&self) -> Session {
        self.open_sessions.fetch_add(1, Ordering::SeqCst);
        Session::new(Arc::clone(&self.options), Arc::clone(&self.open_sessions))
    }

    /// Run `f` with a fresh session, releasing it on every exit path.
    pub async fn with_session<F, T>(&self, f: F) -> Result<T, DbError>
    where
        F: for<'s> FnOnce(&'s mut Session) -> BoxFuture<'s, Result<T, DbError>>,
    {
        let mut session = self.session();
        let result = f(&mut session).await;
        session.close();
        result
    }

    /// Number of sessions currently alive.
    pub fn open_sessions(&self) -> usize {
        self.open_sessions.load(Ordering::SeqCst)
    }
}
