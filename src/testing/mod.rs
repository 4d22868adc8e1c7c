//! Test support
//!
//! * [`RecordingSink`]: a [`LogSink`](crate::LogSink) that captures entries
//! * [`Teardown`]: terminates a disposable instance exactly once
//! * `provision_test_database` (feature `testcontainers`): a throwaway
//!   Postgres server per test

mod sink;
mod teardown;

#[cfg(feature = "testcontainers")]
mod postgres;

pub use sink::{Level, LogEntry, RecordingSink};
pub use teardown::{DisposableInstance, Teardown};

#[cfg(feature = "testcontainers")]
pub use postgres::{
    provision_test_database, PostgresContainer, TestDatabase, POSTGRES_TAG, TEST_DATABASE,
    TEST_PASSWORD, TEST_USER,
};
