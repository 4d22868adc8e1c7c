//! Logging sink and tracing setup
//!
//! Every operation that reports something takes a [`LogSink`] instead of
//! logging through global state, so tests can swap in a recording double.
//! [`TracingSink`] is the production sink and forwards to `tracing`.

use crate::{Error, Result};
use std::fmt;
use tracing_subscriber::EnvFilter;

/// A structured key/value pair attached to a log entry
pub type Field<'a> = (&'static str, &'a dyn fmt::Display);

/// Destination for leveled, structured log messages
pub trait LogSink: Send + Sync {
    /// Informational message
    fn info(&self, message: &str, fields: &[Field<'_>]);

    /// Recoverable failure
    fn error(&self, message: &str, fields: &[Field<'_>]);

    /// Unrecoverable failure; must not return
    fn fatal(&self, message: &str, fields: &[Field<'_>]) -> !;
}

/// Keys emitted as their own `tracing` fields. Any other key is folded into
/// a single `context` field.
const KNOWN_KEYS: [&str; 5] = ["error", "host", "port", "dbname", "mode"];

macro_rules! sink_event {
    ($level:expr, $message:expr, $fields:expr $(, $key:ident = $value:expr)*) => {{
        let fields: &[Field<'_>] = $fields;
        tracing::event!(
            $level,
            $($key = $value,)*
            error = lookup(fields, "error").map(tracing::field::display),
            host = lookup(fields, "host").map(tracing::field::display),
            port = lookup(fields, "port").map(tracing::field::display),
            dbname = lookup(fields, "dbname").map(tracing::field::display),
            mode = lookup(fields, "mode").map(tracing::field::display),
            context = Unknown::of(fields).map(tracing::field::display),
            "{}",
            $message
        )
    }};
}

/// [`LogSink`] backed by `tracing`. `fatal` exits the process with status 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn info(&self, message: &str, fields: &[Field<'_>]) {
        sink_event!(tracing::Level::INFO, message, fields);
    }

    fn error(&self, message: &str, fields: &[Field<'_>]) {
        sink_event!(tracing::Level::ERROR, message, fields);
    }

    fn fatal(&self, message: &str, fields: &[Field<'_>]) -> ! {
        sink_event!(tracing::Level::ERROR, message, fields, fatal = true);
        std::process::exit(1)
    }
}

fn lookup<'a>(fields: &'a [Field<'a>], key: &str) -> Option<&'a dyn fmt::Display> {
    fields.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Renders the fields without a dedicated key as `key=value` pairs
struct Unknown<'a, 'b>(&'a [Field<'b>]);

impl<'a, 'b> Unknown<'a, 'b> {
    fn of(fields: &'a [Field<'b>]) -> Option<Self> {
        fields
            .iter()
            .any(|(k, _)| !KNOWN_KEYS.contains(k))
            .then_some(Self(fields))
    }
}

impl fmt::Display for Unknown<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unknown = self.0.iter().filter(|(k, _)| !KNOWN_KEYS.contains(k));
        for (i, (key, value)) in unknown.enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}={}", key, value)?;
        }
        Ok(())
    }
}

/// Install a global `tracing` subscriber.
///
/// `filter` uses `EnvFilter` syntax (e.g. `info`, `pgconnect=debug`); an
/// invalid filter falls back to `info`. With `json` set, events are written
/// as JSON lines.
///
/// # Errors
///
/// Returns `Error::Config` if a global subscriber is already installed.
pub fn init_tracing(filter: &str, json: bool) -> Result<()> {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));

    let result = if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .try_init()
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).try_init()
    };

    result.map_err(|e| Error::Config(format!("failed to install tracing subscriber: {}", e)))
}
