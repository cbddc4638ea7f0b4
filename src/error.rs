//! Unified error types for the service.

use std::time::Duration;

use thiserror::Error;

/// Unified error type for the service.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// A setting was present but could not be used.
    #[error("invalid setting {name}={value:?}")]
    InvalidSetting {
        /// Environment variable name.
        name: &'static str,
        /// Offending value.
        value: String,
    },

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] DbError),

    /// Cache error.
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Database factory and session errors.
#[derive(Error, Debug)]
pub enum DbError {
    /// The composed connection URL could not be parsed.
    #[error("invalid database url: {0}")]
    InvalidUrl(#[source] sqlx::Error),

    /// A connection could not be opened or lost its server.
    #[error("database connection failed: {0}")]
    Connection(#[source] sqlx::Error),

    /// A statement failed.
    #[error("query failed: {0}")]
    Query(#[from] sqlx::Error),

    /// Table materialization failed.
    #[error("failed to create table {table}: {source}")]
    CreateTable {
        /// Table being created.
        table: &'static str,
        /// Underlying error.
        #[source]
        source: sqlx::Error,
    },
}

/// Cache factory and connectivity errors.
#[derive(Error, Debug)]
pub enum CacheError {
    /// A cache setting could not be used to build the client.
    #[error("invalid redis setting {name}={value:?}")]
    InvalidSetting {
        /// Environment variable name.
        name: &'static str,
        /// Offending value.
        value: String,
    },

    /// Building the client failed.
    #[error("invalid redis client configuration: {0}")]
    Client(#[source] redis::RedisError),

    /// Connecting or probing failed.
    #[error("redis connection failed: {0}")]
    Connection(#[from] redis::RedisError),

    /// The probe did not complete in time.
    #[error("redis connection failed: no reply within {0:?}")]
    Timeout(Duration),
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, ServiceError>;
