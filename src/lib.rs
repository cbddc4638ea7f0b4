//! DdOaListDownload service scaffold.
//!
//! A small HTTP process exposing a liveness probe and a stub legacy API,
//! wired to a MySQL connection factory and a Redis client whose connectivity
//! is checked once at startup.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`database`]: MySQL engine, schema registry and sessions
//! - [`cache`]: Redis client and connectivity self-test
//! - [`api`]: HTTP routes and handlers
//! - [`app`]: Startup sequence
//! - [`metrics`]: Dependency counters

pub mod api;
pub mod app;
pub mod cache;
pub mod config;
pub mod database;
pub mod error;
pub mod metrics;

pub use app::{Application, Server};
pub use config::Config;
pub use error::{Result, ServiceError};
