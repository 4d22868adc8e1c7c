//! Open modes and the option set a handle is opened with

/// Which kind of work a connection is opened for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Normal application traffic
    Runtime,
    /// Applying schema changes
    Migration,
}

impl OpenMode {
    /// Stable lowercase name, used in logs and metric labels
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Runtime => "runtime",
            Self::Migration => "migration",
        }
    }
}

impl std::fmt::Display for OpenMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Effective options of an opened handle
///
/// Use [`OpenOptions::runtime`] or [`OpenOptions::migration`] for the two
/// built-in modes. Both disable statement caching. Migration additionally
/// disables foreign-key creation, since migrations add constraints
/// themselves once every table exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenOptions {
    mode: OpenMode,
    prepare_statements: bool,
    create_foreign_keys_on_migrate: bool,
}

impl OpenOptions {
    /// Options for normal operation
    pub fn runtime() -> Self {
        Self {
            mode: OpenMode::Runtime,
            prepare_statements: false,
            create_foreign_keys_on_migrate: true,
        }
    }

    /// Options for schema migration
    pub fn migration() -> Self {
        Self {
            mode: OpenMode::Migration,
            prepare_statements: false,
            create_foreign_keys_on_migrate: false,
        }
    }

    /// Allow or forbid callers to cache prepared statements on the handle
    pub fn prepare_statements(mut self, enabled: bool) -> Self {
        self.prepare_statements = enabled;
        self
    }

    /// Enable or disable automatic foreign-key creation while migrating
    pub fn create_foreign_keys_on_migrate(mut self, enabled: bool) -> Self {
        self.create_foreign_keys_on_migrate = enabled;
        self
    }

    /// Mode these options were built for
    pub fn mode(&self) -> OpenMode {
        self.mode
    }

    /// Whether callers may cache prepared statements
    pub fn caches_statements(&self) -> bool {
        self.prepare_statements
    }

    /// Whether migrations may create foreign keys automatically
    pub fn creates_foreign_keys_on_migrate(&self) -> bool {
        self.create_foreign_keys_on_migrate
    }
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self::runtime()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_defaults() {
        let opts = OpenOptions::runtime();
        assert_eq!(opts.mode(), OpenMode::Runtime);
        assert!(!opts.caches_statements());
        assert!(opts.creates_foreign_keys_on_migrate());
        assert_eq!(OpenOptions::default(), opts);
    }

    #[test]
    fn test_migration_never_creates_foreign_keys() {
        let opts = OpenOptions::migration();
        assert_eq!(opts.mode(), OpenMode::Migration);
        assert!(!opts.caches_statements());
        assert!(!opts.creates_foreign_keys_on_migrate());
    }

    #[test]
    fn test_modes_differ_only_in_foreign_keys() {
        let runtime = OpenOptions::runtime();
        let migration = OpenOptions::migration();
        assert_eq!(runtime.caches_statements(), migration.caches_statements());
        assert_ne!(
            runtime.creates_foreign_keys_on_migrate(),
            migration.creates_foreign_keys_on_migrate()
        );
    }

    #[test]
    fn test_builder_toggles() {
        let opts = OpenOptions::runtime()
            .prepare_statements(true)
            .create_foreign_keys_on_migrate(false);
        assert!(opts.caches_statements());
        assert!(!opts.creates_foreign_keys_on_migrate());
        assert_eq!(opts.mode(), OpenMode::Runtime);
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(OpenMode::Runtime.to_string(), "runtime");
        assert_eq!(OpenMode::Migration.to_string(), "migration");
    }
}
