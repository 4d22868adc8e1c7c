//! Environment-backed configuration source

use super::ConfigSource;

/// Reads the six connection parameters from `<PREFIX>_*` environment variables
///
/// Variables: `_HOST`, `_PORT`, `_USER`, `_PASSWORD`, `_NAME`, `_SSLMODE`.
/// A missing or non-UTF-8 variable reads as an empty string.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct EnvSource {
    host: String,
    port: String,
    user: String,
    password: String,
    name: String,
    sslmode: String,
}

impl EnvSource {
    /// Prefix used by [`EnvSource::from_env`]
    pub const DEFAULT_PREFIX: &'static str = "DB";

    /// Read `DB_HOST`, `DB_PORT`, ... from the process environment
    pub fn from_env() -> Self {
        Self::with_prefix(Self::DEFAULT_PREFIX)
    }

    /// Read `<prefix>_HOST`, `<prefix>_PORT`, ... from the process environment
    pub fn with_prefix(prefix: &str) -> Self {
        let var = |key: &str| std::env::var(format!("{}_{}", prefix, key)).unwrap_or_default();

        Self {
            host: var("HOST"),
            port: var("PORT"),
            user: var("USER"),
            password: var("PASSWORD"),
            name: var("NAME"),
            sslmode: var("SSLMODE"),
        }
    }
}

impl ConfigSource for EnvSource {
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

impl std::fmt::Debug for EnvSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvSource")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("sslmode", &self.sslmode)
            .finish()
    }
}
