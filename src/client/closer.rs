//! Best-effort handle release

use crate::connection::ConnectionHandle;
use crate::logging::LogSink;
use crate::metrics::{counters, labels};
use crate::Error;

/// Release a connection handle.
///
/// `None` is a no-op. Otherwise the client is dropped, which sends
/// `Terminate` to the server, and the driver task is awaited. The outcome is
/// logged to `sink`; errors are never returned and never panic, so this is
/// safe to call on any shutdown path.
///
/// Must not run while other callers are still using the same handle; taking
/// it by value enforces that.
pub async fn close(handle: Option<ConnectionHandle>, sink: &dyn LogSink) {
    let Some(mut handle) = handle else {
        return;
    };

    let driver = match handle.release() {
        Ok(driver) => driver,
        Err(e) => {
            counters::connection_closed(labels::OUTCOME_ERROR);
            sink.error(
                "failed to obtain database connection for closing",
                &[("error", &e)],
            );
            return;
        }
    };

    drop(handle);

    let result = match driver.await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(Error::from(e)),
        Err(e) => Err(Error::from(e)),
    };

    match result {
        Ok(()) => {
            counters::connection_closed(labels::OUTCOME_OK);
            sink.info("database connection closed", &[]);
        }
        Err(e) => {
            counters::connection_closed(labels::OUTCOME_ERROR);
            sink.error("error while closing database connection", &[("error", &e)]);
        }
    }
}
