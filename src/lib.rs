//! pgconnect: Postgres connection lifecycle helpers
//!
//! Turns six connection parameters into a live, correctly configured
//! database handle and releases it again without ever crashing a shutdown
//! path.
//!
//! * [`ConnectionConfig`] holds host, port, user, password, database name
//!   and sslmode. Adapt your own config types through [`ConfigSource`].
//! * [`ConnectionManager`] opens handles in runtime mode or migration mode
//!   (foreign-key creation suspended). A failed connection is fatal by
//!   default; see [`FailurePolicy`].
//! * [`close`] releases a handle on a best-effort basis.
//! * [`testing`] provides a recording log sink and, with the
//!   `testcontainers` feature, disposable Postgres servers for tests.
//!
//! All reporting goes through an injected [`LogSink`]; [`TracingSink`]
//! forwards to `tracing`.
//!
//! # Example
//!
//! ```no_run
//! # async fn example() -> pgconnect::Result<()> {
//! use pgconnect::{ConnectionConfig, ConnectionManager};
//!
//! pgconnect::init_tracing("info", false)?;
//!
//! let config = ConnectionConfig::new("localhost", "5432", "app", "secret", "appdb", "disable");
//! let manager = ConnectionManager::with_tracing();
//!
//! let handle = manager.connect(&config).await?;
//! handle.client().simple_query("SELECT 1").await?;
//! manager.close(Some(handle)).await;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

mod client;
mod config;
mod connection;
mod error;
mod logging;
mod metrics;
pub mod testing;

pub use client::{close, ConnectionManager, FailurePolicy};
pub use config::{ConfigSource, ConnectionConfig, EnvSource};
pub use connection::{ConnectionHandle, ConnectionState, OpenMode, OpenOptions};
pub use error::{Error, Result};
pub use logging::{init_tracing, Field, LogSink, TracingSink};
