//! Service bootstrap.
//!
//! Owns the handles built from the configuration snapshot and runs the
//! startup sequence in order:
//! 1. announce startup
//! 2. cache connectivity self-test (failure is logged, never fatal)
//! 3. bind `0.0.0.0:{SERVER_PORT}` and log the bound address
//! 4. serve until the process is terminated

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

use crate::api::{create_router, AppState, SERVICE_NAME};
use crate::cache::CacheClient;
use crate::config::Config;
use crate::database::Database;
use crate::error::{Result, ServiceError};

/// Fully wired service, not yet listening.
#[derive(Debug)]
pub struct Application {
    state: AppState,
}

impl Application {
    /// Construct every dependency handle and materialize the schema.
    ///
    /// No network traffic happens here while the schema registry is empty.
    pub async fn build(config: Config) -> Result<Self> {
        let database = Database::new(&config)?;
        database.create_tables().await?;
        let cache = CacheClient::new(&config)?;

        Ok(Self::from_parts(Arc::new(config), database, cache))
    }

    /// Assemble from handles that were built elsewhere.
    pub fn from_parts(config: Arc<Config>, database: Database, cache: CacheClient) -> Self {
        Self {
            state: AppState::new(config, database, cache),
        }
    }

    /// Shared state handed to the router.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Run the startup sequence up to and including binding the listener.
    pub async fn bind(self) -> Result<Server> {
        let config = Arc::clone(&self.state.config);
        info!("Starting {} service", SERVICE_NAME);
        debug!("Configuration:\n{}", config.summary());

        match self.state.cache.ping().await {
            Ok(pong) => info!(response = %pong, "Redis connection succeeded"),
            Err(e) => error!(addr = %self.state.cache.addr(), "Redis connection failed: {}", e),
        }

        let addr: SocketAddr = config
            .listen_addr()
            .parse()
            .map_err(|_| ServiceError::InvalidSetting {
                name: "SERVER_PORT",
                value: config.server_port.clone(),
            })?;
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        info!("HTTP server listening on {}", local_addr);

        Ok(Server {
            listener,
            router: create_router(self.state),
            local_addr,
        })
    }
}

/// Bound HTTP listener with its router.
#[derive(Debug)]
pub struct Server {
    listener: TcpListener,
    router: Router,
    local_addr: SocketAddr,
}

impl Server {
    /// Address the listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serve requests until the process is terminated.
    pub async fn run(self) -> Result<()> {
        axum::serve(self.listener, self.router).await?;
        Ok(())
    }
}
