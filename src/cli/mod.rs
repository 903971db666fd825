//! CLI operation mode handlers.
//!
//! - [`overlay`]: merges the wiki-hosted configuration into the local one
//! - [`migrations`]: database schema migrations
//! - [`sync`]: one synchronisation run

use std::sync::Arc;

use gerrit_sync::SyncConfig;
use gerrit_sync::telemetry::{NoopTelemetrySink, StderrJsonlTelemetrySink, TelemetrySink};

pub mod migrations;
pub mod overlay;
pub mod sync;

/// Telemetry sink selected by the `telemetry` flag.
pub fn telemetry_sink(config: &SyncConfig) -> Arc<dyn TelemetrySink> {
    if config.telemetry {
        Arc::new(StderrJsonlTelemetrySink)
    } else {
        Arc::new(NoopTelemetrySink)
    }
}
