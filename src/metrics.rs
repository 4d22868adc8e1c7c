//! Connection lifecycle metrics
//!
//! Counters are recorded through the `metrics` facade; they are no-ops
//! until the application installs a recorder.

/// Label values
pub(crate) mod labels {
    pub const OUTCOME_OK: &str = "ok";
    pub const OUTCOME_ERROR: &str = "error";
}

/// Counter helpers
pub(crate) mod counters {
    use crate::connection::OpenMode;

    /// A connection was opened
    pub fn connection_opened(mode: OpenMode) {
        ::metrics::counter!("pgconnect_connections_opened_total", "mode" => mode.as_str())
            .increment(1);
    }

    /// A connection attempt failed
    pub fn connection_failed(mode: OpenMode) {
        ::metrics::counter!("pgconnect_connection_failures_total", "mode" => mode.as_str())
            .increment(1);
    }

    /// A handle was released
    pub fn connection_closed(outcome: &'static str) {
        ::metrics::counter!("pgconnect_connections_closed_total", "outcome" => outcome)
            .increment(1);
    }
}
