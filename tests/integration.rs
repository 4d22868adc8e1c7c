//! Integration tests for pgconnect
//!
//! Tests marked `#[ignore]` require a running Postgres instance, addressed
//! through `PGCONNECT_TEST_HOST`, `_PORT`, `_USER`, `_PASSWORD`, `_NAME` and
//! `_SSLMODE`:
//!
//! ```bash
//! export PGCONNECT_TEST_HOST=localhost PGCONNECT_TEST_PORT=5432 \
//!   PGCONNECT_TEST_USER=postgres PGCONNECT_TEST_PASSWORD=postgres \
//!   PGCONNECT_TEST_NAME=postgres PGCONNECT_TEST_SSLMODE=disable
//! cargo test --test integration -- --ignored
//! ```

use pgconnect::testing::{Level, RecordingSink};
use pgconnect::{
    close, ConfigSource, ConnectionConfig, ConnectionManager, ConnectionState, EnvSource,
    FailurePolicy, OpenOptions,
};
use std::sync::Arc;
use tokio_test::{assert_err, assert_ok};

fn test_config() -> ConnectionConfig {
    ConnectionConfig::from_source(&EnvSource::with_prefix("PGCONNECT_TEST"))
}

fn recording_manager() -> (ConnectionManager, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::new());
    let manager = ConnectionManager::new(sink.clone()).failure_policy(FailurePolicy::ReturnError);
    (manager, sink)
}

#[test]
fn test_end_to_end_connection_string() {
    let config = ConnectionConfig::new("localhost", "5432", "app", "secret", "appdb", "disable");
    assert_eq!(
        config.connection_string(),
        "host=localhost port=5432 user=app password=secret dbname=appdb sslmode=disable"
    );
}

#[tokio::test]
async fn test_unreachable_host_returns_error_and_logs() {
    let (manager, sink) = recording_manager();
    let config = ConnectionConfig::new("127.0.0.1", "1", "app", "secret", "appdb", "disable");

    let err = assert_err!(manager.connect(&config).await);

    let entries = sink.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].level, Level::Error);
    let logged = entries[0].field("error").unwrap();
    assert_eq!(logged, err.to_string());
    assert!(!logged.contains("secret"));
}

#[tokio::test]
async fn test_unreachable_host_is_fatal_by_default() {
    let sink = Arc::new(RecordingSink::new());
    let manager = ConnectionManager::new(sink.clone());

    let task = tokio::spawn(async move {
        let config = ConnectionConfig::new("127.0.0.1", "1", "app", "secret", "appdb", "disable");
        manager.connect_for_migration(&config).await
    });

    // The fatal sink never lets `connect_for_migration` return a value.
    let join_err = assert_err!(task.await);
    assert!(join_err.is_panic());

    let entries = sink.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].level, Level::Fatal);
    assert_eq!(
        entries[0].message,
        "failed to connect to database for migration"
    );
    assert!(entries[0].field("error").is_some());
}

#[tokio::test]
async fn test_close_none_logs_nothing() {
    let sink = RecordingSink::new();
    close(None, &sink).await;
    assert!(sink.is_empty());
}

#[tokio::test]
#[ignore] // Requires Postgres running
async fn test_connect_query_close() {
    let (manager, sink) = recording_manager();
    let config = test_config();

    let handle = assert_ok!(manager.connect(&config).await);
    assert_eq!(handle.state(), ConnectionState::Connected);
    assert_eq!(handle.options(), OpenOptions::runtime());

    let rows = assert_ok!(handle.client().query("SELECT 1::INT4", &[]).await);
    let one: i32 = rows[0].get(0);
    assert_eq!(one, 1);

    manager.close(Some(handle)).await;

    let entries = sink.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].message, "database connection established");
    assert_eq!(entries[0].field("dbname"), Some(config.name()));
    assert_eq!(entries[1].level, Level::Info);
    assert_eq!(entries[1].message, "database connection closed");
}

#[tokio::test]
#[ignore] // Requires Postgres running
async fn test_migration_mode_options() {
    let (manager, _sink) = recording_manager();

    let handle = assert_ok!(manager.connect_for_migration(&test_config()).await);
    let options = handle.options();
    assert!(!options.creates_foreign_keys_on_migrate());
    assert!(!options.caches_statements());

    manager.close(Some(handle)).await;
}
