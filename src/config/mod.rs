//! Connection parameters
//!
//! This module handles:
//! * The immutable [`ConnectionConfig`] value
//! * The [`ConfigSource`] contract for adapting caller-owned config types
//! * Rendering the key/value connection string understood by the driver

mod env;

pub use env::EnvSource;

use serde::Deserialize;

/// Anything that can supply the six connection parameters
///
/// Implement this for your own configuration struct and hand it to
/// [`ConnectionConfig::from_source`].
pub trait ConfigSource {
    /// Server host name or address
    fn host(&self) -> &str;
    /// Server port (kept as text)
    fn port(&self) -> &str;
    /// Role to connect as
    fn user(&self) -> &str;
    /// Password for `user`
    fn password(&self) -> &str;
    /// Database name
    fn name(&self) -> &str;
    /// Transport security mode (`disable`, `require`, ...)
    fn sslmode(&self) -> &str;
}

/// Parameters addressing a single Postgres database
///
/// Values are not validated here; bad ones are rejected when the
/// connection is attempted. The password is never printed by `Debug`.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct ConnectionConfig {
    host: String,
    port: String,
    user: String,
    password: String,
    #[serde(alias = "dbname")]
    name: String,
    #[serde(alias = "ssl_mode")]
    sslmode: String,
}

impl ConnectionConfig {
    /// Create a configuration from its six parameters
    pub fn new(
        host: impl Into<String>,
        port: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
        name: impl Into<String>,
        sslmode: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port: port.into(),
            user: user.into(),
            password: password.into(),
            name: name.into(),
            sslmode: sslmode.into(),
        }
    }

    /// Copy the parameters out of any [`ConfigSource`]
    pub fn from_source<S: ConfigSource + ?Sized>(source: &S) -> Self {
        Self::new(
            source.host(),
            source.port(),
            source.user(),
            source.password(),
            source.name(),
            source.sslmode(),
        )
    }

    /// Render the key/value connection string
    ///
    /// Format: `host=<h> port=<p> user=<u> password=<pw> dbname=<n> sslmode=<s>`.
    /// Values are inserted verbatim, without quoting or escaping.
    pub fn connection_string(&self) -> String {
        format!(
            "host={} port={} user={} password={} dbname={} sslmode={}",
            self.host, self.port, self.user, self.password, self.name, self.sslmode
        )
    }
}

impl ConfigSource for ConnectionConfig {
    fn host(&self) -> &str {
        &self.host
    }

    fn port(&self) -> &str {
        &self.port
    }

    fn user(&self) -> &str {
        &self.user
    }

    fn password(&self) -> &str {
        &self.password
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn sslmode(&self) -> &str {
        &self.sslmode
    }
}

impl<S: ConfigSource> From<&S> for ConnectionConfig {
    fn from(source: &S) -> Self {
        Self::from_source(source)
    }
}

impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("sslmode", &self.sslmode)
            .finish()
    }
}
