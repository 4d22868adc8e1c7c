//! Open database handle

use super::options::OpenOptions;
use super::state::ConnectionState;
use super::tls::{make_tls_connect, split_sslmode, SslMode};
use crate::{Error, Result};
use tokio::task::JoinHandle;
use tokio_postgres::{Client, NoTls};

/// Background task driving the connection socket
pub(crate) type Driver = JoinHandle<std::result::Result<(), tokio_postgres::Error>>;

/// A live connection to Postgres
///
/// Wraps the driver's [`Client`] together with the task that drives its
/// socket. Queries go through [`ConnectionHandle::client`], which may be
/// shared by reference between concurrent callers. Release the handle with
/// [`close`](crate::close); dropping it also ends the connection, but
/// without logging the outcome.
pub struct ConnectionHandle {
    client: Client,
    driver: Option<Driver>,
    options: OpenOptions,
    state: ConnectionState,
}

impl ConnectionHandle {
    /// Parse `dsn` and connect.
    ///
    /// All libpq `sslmode` values are accepted. The driver negotiates TLS;
    /// certificate checks follow the requested mode.
    pub(crate) async fn open(dsn: &str, options: OpenOptions) -> Result<Self> {
        let (sslmode, dsn) = split_sslmode(dsn)?;
        let config: tokio_postgres::Config = dsn.parse()?;

        let (client, driver) = match sslmode {
            SslMode::Disable => {
                let (client, connection) = config.connect(NoTls).await?;
                (client, tokio::spawn(connection))
            }
            mode => {
                let (client, connection) = config.connect(make_tls_connect(mode)?).await?;
                (client, tokio::spawn(connection))
            }
        };

        let mut state = ConnectionState::Unconnected;
        state.transition(ConnectionState::Connected)?;

        Ok(Self {
            client,
            driver: Some(driver),
            options,
            state,
        })
    }

    /// The driver client, for running queries
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Options this handle was opened with
    pub fn options(&self) -> OpenOptions {
        self.options
    }

    /// Current lifecycle state
    ///
    /// Reports `Closed` as soon as the server side has gone away, even if
    /// the handle has not been released yet.
    pub fn state(&self) -> ConnectionState {
        if self.client.is_closed() {
            ConnectionState::Closed
        } else {
            self.state
        }
    }

    /// Mark the handle closed and hand out its driver task.
    ///
    /// Fails with [`Error::ConnectionClosed`] if the connection already went
    /// away on its own, leaving nothing to shut down.
    pub(crate) fn release(&mut self) -> Result<Driver> {
        self.state.transition(ConnectionState::Closed)?;

        match self.driver.take() {
            Some(driver) if !driver.is_finished() && !self.client.is_closed() => Ok(driver),
            _ => Err(Error::ConnectionClosed),
        }
    }
}

impl std::fmt::Debug for ConnectionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionHandle")
            .field("options", &self.options)
            .field("state", &self.state())
            .finish()
    }
}
