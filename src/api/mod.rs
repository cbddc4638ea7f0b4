//! HTTP API module for the health and legacy endpoints.

pub mod handlers;
pub mod routes;

pub use handlers::{AppState, SERVICE_NAME};
pub use routes::create_router;
