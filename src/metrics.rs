//! Counters for dependency wiring.
//!
//! This module provides metrics for:
//! - Cache connectivity probe outcomes
//! - Database sessions that actually acquired a connection
//! - Tables materialized at startup
//!
//! No exporter is installed by the service; without a recorder these are no-ops.

use metrics::{counter, describe_counter};
use tracing::debug;

// === Metric Name Constants ===

/// Cache probe counter metric name, labelled by `outcome`.
pub const METRIC_CACHE_PROBES: &str = "cache_probe_total";
/// Database sessions opened counter metric name.
pub const METRIC_DB_SESSIONS_OPENED: &str = "db_sessions_opened_total";
/// Tables created counter metric name.
pub const METRIC_DB_TABLES_CREATED: &str = "db_tables_created_total";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_counter!(
        METRIC_CACHE_PROBES,
        "Total number of cache connectivity probes by outcome"
    );
    describe_counter!(
        METRIC_DB_SESSIONS_OPENED,
        "Total number of database sessions that acquired a connection"
    );
    describe_counter!(
        METRIC_DB_TABLES_CREATED,
        "Total number of CREATE TABLE IF NOT EXISTS statements issued"
    );

    debug!("Metrics initialized");
}

/// Record a cache probe outcome.
pub fn record_cache_probe(success: bool) {
    let outcome = if success { "success" } else { "failure" };
    counter!(METRIC_CACHE_PROBES, "outcome" => outcome).increment(1);
}

/// Increment database sessions opened counter.
pub fn inc_sessions_opened() {
    counter!(METRIC_DB_SESSIONS_OPENED).increment(1);
}

/// Increment tables created counter.
pub fn inc_tables_created() {
    counter!(METRIC_DB_TABLES_CREATED).increment(1);
}
