//! Application telemetry events and sinks.
//!
//! The bot runs unattended, so alongside the human-oriented `tracing` output it
//! can emit machine-readable events: the active database schema version and
//! the outcome of every reconciled pull request.

use std::io;

use serde::{Deserialize, Serialize};

/// A structured telemetry event emitted by the sync bot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TelemetryEvent {
    /// Records the current database schema version after migrations apply.
    SchemaVersionRecorded {
        /// Diesel migration version string (e.g. `20261019000000`).
        schema_version: String,
    },

    /// Records the result of reconciling one pull request.
    PullRequestReconciled {
        /// Repository the pull request belongs to.
        repository: String,
        /// Patch URL identifying the pull request.
        patch_url: String,
        /// `skipped`, `submitted`, or `updated`.
        outcome: String,
        /// Gerrit Change-Id, absent for skipped pull requests.
        change_id: Option<String>,
    },
}

/// A sink that can record telemetry events.
pub trait TelemetrySink: Send + Sync {
    /// Records a telemetry event.
    fn record(&self, event: TelemetryEvent);
}

/// Telemetry sink that drops all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTelemetrySink;

impl TelemetrySink for NoopTelemetrySink {
    fn record(&self, _event: TelemetryEvent) {}
}

/// Records telemetry events to stderr as JSON lines (JSONL).
#[derive(Debug, Default)]
pub struct StderrJsonlTelemetrySink;

impl TelemetrySink for StderrJsonlTelemetrySink {
    fn record(&self, event: TelemetryEvent) {
        let Ok(serialised) = serde_json::to_string(&event) else {
            return;
        };

        let _ignored = writeln_stderr(&serialised);
    }
}

fn writeln_stderr(message: &str) -> io::Result<()> {
    use io::Write;

    let mut stderr = io::stderr().lock();
    writeln!(stderr, "{message}")
}

#[cfg(any(test, feature = "test-support"))]
pub mod test_support {
    //! Telemetry sinks for tests.

    use std::sync::{Arc, Mutex, PoisonError};

    use super::{TelemetryEvent, TelemetrySink};

    /// Sink that keeps every event for later assertions.
    ///
    /// Clones share the same event buffer.
    #[derive(Debug, Default, Clone)]
    pub struct RecordingSink {
        events: Arc<Mutex<Vec<TelemetryEvent>>>,
    }

    impl RecordingSink {
        /// Removes and returns the events recorded so far.
        #[must_use]
        pub fn take(&self) -> Vec<TelemetryEvent> {
            self.events
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .drain(..)
                .collect()
        }
    }

    impl TelemetrySink for RecordingSink {
        fn record(&self, event: TelemetryEvent) {
            self.events
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(event);
        }
    }
}
