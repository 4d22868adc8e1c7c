//! Error types

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while opening or releasing a database connection
#[derive(Debug, Error)]
pub enum Error {
    /// The driver rejected the connection string or failed to connect
    #[error("postgres error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    /// Invalid configuration (TLS setup, logging setup, etc.)
    #[error("invalid configuration: {0}")]
    Config(String),

    /// TLS backend error
    #[error("tls error: {0}")]
    Tls(#[from] rustls::Error),

    /// Illegal connection lifecycle transition
    #[error("invalid state: expected {expected}, got {actual}")]
    InvalidState {
        /// Expected state
        expected: String,
        /// Actual state
        actual: String,
    },

    /// The connection driver already stopped, nothing left to close
    #[error("connection already closed")]
    ConnectionClosed,

    /// The connection driver task panicked or was cancelled
    #[error("connection driver task failed: {0}")]
    Driver(#[from] tokio::task::JoinError),
}

impl Error {
    /// Whether this error came from the Postgres driver itself
    pub fn is_postgres(&self) -> bool {
        matches!(self, Self::Postgres(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_state_display() {
        let err = Error::InvalidState {
            expected: "valid transition from Closed".into(),
            actual: "Connected".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid state: expected valid transition from Closed, got Connected"
        );
        assert!(!err.is_postgres());
    }

    #[test]
    fn test_config_display() {
        let err = Error::Config("no root certificates".into());
        assert_eq!(err.to_string(), "invalid configuration: no root certificates");
    }
}
