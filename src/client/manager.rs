//! ConnectionManager implementation

use super::closer;
use crate::config::{ConfigSource, ConnectionConfig};
use crate::connection::{ConnectionHandle, OpenMode, OpenOptions};
use crate::logging::{LogSink, TracingSink};
use crate::metrics::counters;
use crate::{Error, Result};
use std::sync::Arc;
use tracing::Instrument;

/// What to do when a connection cannot be opened
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Log at fatal level; the sink terminates the process
    #[default]
    Exit,
    /// Log at error level and return the error to the caller
    ReturnError,
}

/// Opens database handles in runtime or migration mode
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> pgconnect::Result<()> {
/// use pgconnect::{ConnectionConfig, ConnectionManager, FailurePolicy};
///
/// let config = ConnectionConfig::new("localhost", "5432", "app", "secret", "appdb", "disable");
/// let manager = ConnectionManager::with_tracing().failure_policy(FailurePolicy::ReturnError);
///
/// let handle = manager.connect_for_migration(&config).await?;
/// // ... run migrations ...
/// manager.close(Some(handle)).await;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ConnectionManager {
    sink: Arc<dyn LogSink>,
    policy: FailurePolicy,
}

impl ConnectionManager {
    /// Create a manager reporting to `sink`, with [`FailurePolicy::Exit`]
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self {
            sink,
            policy: FailurePolicy::default(),
        }
    }

    /// Create a manager reporting through `tracing`
    pub fn with_tracing() -> Self {
        Self::new(Arc::new(TracingSink))
    }

    /// Set the failure policy
    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Open a handle for normal operation (statement caching disabled).
    ///
    /// Under [`FailurePolicy::Exit`] a failure never returns: it is logged at
    /// fatal level and the sink ends the process.
    pub async fn connect(&self, config: &ConnectionConfig) -> Result<ConnectionHandle> {
        self.connect_with(config, OpenOptions::runtime()).await
    }

    /// Open a handle for schema migration.
    ///
    /// Statement caching and automatic foreign-key creation are both
    /// disabled; migrations add constraints explicitly once their tables
    /// exist. Same failure policy as [`ConnectionManager::connect`].
    pub async fn connect_for_migration(
        &self,
        config: &ConnectionConfig,
    ) -> Result<ConnectionHandle> {
        self.connect_with(config, OpenOptions::migration()).await
    }

    /// Open a handle with an explicit option set
    pub async fn connect_with(
        &self,
        config: &ConnectionConfig,
        options: OpenOptions,
    ) -> Result<ConnectionHandle> {
        let mode = options.mode();
        let dsn = config.connection_string();

        async {
            match ConnectionHandle::open(&dsn, options).await {
                Ok(handle) => {
                    counters::connection_opened(mode);
                    self.sink.info(
                        success_message(mode),
                        &[
                            ("host", &config.host()),
                            ("port", &config.port()),
                            ("dbname", &config.name()),
                        ],
                    );
                    Ok(handle)
                }
                Err(e) => {
                    counters::connection_failed(mode);
                    self.fail(failure_message(mode), e)
                }
            }
        }
        .instrument(tracing::info_span!(
            "connect",
            mode = %mode,
            host = %config.host(),
            port = %config.port(),
            dbname = %config.name()
        ))
        .await
    }

    /// Release a handle, see [`close`](crate::close)
    pub async fn close(&self, handle: Option<ConnectionHandle>) {
        closer::close(handle, self.sink.as_ref()).await
    }

    fn fail(&self, message: &str, error: Error) -> Result<ConnectionHandle> {
        match self.policy {
            FailurePolicy::Exit => self.sink.fatal(message, &[("error", &error)]),
            FailurePolicy::ReturnError => {
                self.sink.error(message, &[("error", &error)]);
                Err(error)
            }
        }
    }
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

fn success_message(mode: OpenMode) -> &'static str {
    match mode {
        OpenMode::Runtime => "database connection established",
        OpenMode::Migration => "database connection for migration established",
    }
}

fn failure_message(mode: OpenMode) -> &'static str {
    match mode {
        OpenMode::Runtime => "failed to connect to database",
        OpenMode::Migration => "failed to connect to database for migration",
    }
}
