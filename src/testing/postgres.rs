//! Disposable Postgres servers for integration tests

use super::teardown::{DisposableInstance, Teardown};
use crate::config::ConnectionConfig;
use crate::connection::{ConnectionHandle, OpenOptions};
use crate::logging::LogSink;
use testcontainers_modules::postgres::Postgres;
use testcontainers_modules::testcontainers::core::ContainerPort;
use testcontainers_modules::testcontainers::runners::AsyncRunner;
use testcontainers_modules::testcontainers::{ContainerAsync, ImageExt, TestcontainersError};

/// Image tag of the disposable server
pub const POSTGRES_TAG: &str = "17";
/// Database created in the disposable server
pub const TEST_DATABASE: &str = "testdb";
/// Role created in the disposable server
pub const TEST_USER: &str = "test";
/// Password of [`TEST_USER`]
pub const TEST_PASSWORD: &str = "test";

const POSTGRES_PORT: u16 = 5432;

/// A running `postgres` container
pub struct PostgresContainer(ContainerAsync<Postgres>);

impl PostgresContainer {
    /// Start the container and wait until the server accepts connections
    pub async fn start() -> Result<Self, TestcontainersError> {
        let container = Postgres::default()
            .with_db_name(TEST_DATABASE)
            .with_user(TEST_USER)
            .with_password(TEST_PASSWORD)
            .with_tag(POSTGRES_TAG)
            .start()
            .await?;

        tracing::debug!(id = %container.id(), "disposable database started");
        Ok(Self(container))
    }

    /// Connection parameters for the mapped host port, TLS disabled
    pub async fn connection_config(&self) -> Result<ConnectionConfig, TestcontainersError> {
        let host = self.0.get_host().await?;
        let port = self
            .0
            .get_host_port_ipv4(ContainerPort::Tcp(POSTGRES_PORT))
            .await?;

        Ok(ConnectionConfig::new(
            host.to_string(),
            port.to_string(),
            TEST_USER,
            TEST_PASSWORD,
            TEST_DATABASE,
            "disable",
        ))
    }
}

impl DisposableInstance for PostgresContainer {
    fn terminate(self) {
        tracing::debug!(id = %self.0.id(), "terminating disposable database");
        // Dropping the container stops and removes it.
        drop(self.0);
    }
}

/// A connection to a disposable database, plus the guard that removes it
///
/// Dereferences to the [`ConnectionHandle`]. When the value goes out of
/// scope the handle is dropped first, then the container is terminated,
/// exactly once, also when the test panics.
pub struct TestDatabase {
    handle: ConnectionHandle,
    config: ConnectionConfig,
    teardown: Teardown<PostgresContainer>,
}

impl TestDatabase {
    /// The open handle
    pub fn handle(&self) -> &ConnectionHandle {
        &self.handle
    }

    /// Parameters addressing the disposable database, e.g. for
    /// [`ConnectionManager::connect_for_migration`](crate::ConnectionManager::connect_for_migration)
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Close the handle through [`close`](crate::close), then terminate the
    /// container
    pub async fn close(self, sink: &dyn LogSink) {
        let Self {
            handle,
            mut teardown,
            ..
        } = self;
        crate::close(Some(handle), sink).await;
        teardown.run();
    }
}

impl std::ops::Deref for TestDatabase {
    type Target = ConnectionHandle;

    fn deref(&self) -> &Self::Target {
        &self.handle
    }
}

impl std::fmt::Debug for TestDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestDatabase")
            .field("config", &self.config)
            .field("handle", &self.handle)
            .field("teardown", &self.teardown)
            .finish()
    }
}

/// Start a disposable `postgres:17` server and connect to it.
///
/// The container is removed when the returned [`TestDatabase`] goes out of
/// scope. No migrations are applied; run them on the handle yourself. Any
/// failure panics, failing the calling test.
///
/// # Examples
///
/// ```no_run
/// # async fn example() {
/// let db = pgconnect::testing::provision_test_database().await;
/// db.client().simple_query("SELECT 1").await.unwrap();
/// # }
/// ```
pub async fn provision_test_database() -> TestDatabase {
    let container = PostgresContainer::start()
        .await
        .unwrap_or_else(|e| panic!("failed to start container: {}", e));

    let teardown = Teardown::register(container);

    let config = match teardown.instance() {
        Some(container) => container
            .connection_config()
            .await
            .unwrap_or_else(|e| panic!("failed to get dsn: {}", e)),
        None => panic!("disposable database terminated before use"),
    };
    let dsn = format!("{} options='-c TimeZone=UTC'", config.connection_string());

    let handle = ConnectionHandle::open(&dsn, OpenOptions::runtime())
        .await
        .unwrap_or_else(|e| panic!("failed to connect to test database: {}", e));

    TestDatabase {
        handle,
        config,
        teardown,
    }
}
