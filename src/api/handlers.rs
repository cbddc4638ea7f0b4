//! HTTP API handlers.

use std::sync::Arc;

use axum::{response::IntoResponse, Json};
use serde::Serialize;

use crate::cache::CacheClient;
use crate::config::Config;
use crate::database::Database;

/// Service name reported by the health probe.
pub const SERVICE_NAME: &str = "DdOaListDownload Python";

/// Application state shared with handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Configuration snapshot.
    pub config: Arc<Config>,
    /// Database handle.
    pub database: Database,
    /// Cache handle.
    pub cache: CacheClient,
}

impl AppState {
    /// Create new app state from explicitly constructed handles.
    pub fn new(config: Arc<Config>, database: Database, cache: CacheClient) -> Self {
        Self {
            config,
            database,
            cache,
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
    /// Human-readable message.
    pub message: String,
}

/// Legacy API response.
#[derive(Debug, Serialize)]
pub struct LegacyResponse {
    /// Status: "ok".
    pub status: &'static str,
    /// Human-readable message.
    pub message: &'static str,
    /// Payload.
    pub data: LegacyData,
}

/// Payload of the legacy API response.
#[derive(Debug, Serialize)]
pub struct LegacyData {
    /// API generation.
    pub version: &'static str,
    /// Backing service.
    pub service: &'static str,
}

/// Health check handler - always returns 200.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        message: format!("{SERVICE_NAME} 服务运行正常"),
    })
}

/// Legacy API stub - always returns 200 with a fixed payload.
pub async fn legacy() -> impl IntoResponse {
    Json(LegacyResponse {
        status: "ok",
        message: "旧版API调用成功",
        data: LegacyData {
            version: "legacy",
            service: "python",
        },
    })
}
