//! Property-based tests for configuration adaptation and connection strings.

use pgconnect::{ConfigSource, ConnectionConfig};
use proptest::prelude::*;

/// A caller-owned config type with its own field names
#[derive(Debug, Clone)]
struct ServiceSettings {
    db_host: String,
    db_port: String,
    db_user: String,
    db_password: String,
    db_name: String,
    db_ssl: String,
}

impl ConfigSource for ServiceSettings {
    fn host(&self) -> &str {
        &self.db_host
    }
    fn port(&self) -> &str {
        &self.db_port
    }
    fn user(&self) -> &str {
        &self.db_user
    }
    fn password(&self) -> &str {
        &self.db_password
    }
    fn name(&self) -> &str {
        &self.db_name
    }
    fn sslmode(&self) -> &str {
        &self.db_ssl
    }
}

fn arb_sslmode() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("disable".to_string()),
        Just("prefer".to_string()),
        Just("require".to_string()),
    ]
}

fn arb_settings() -> impl Strategy<Value = ServiceSettings> {
    (
        "[a-z0-9.-]{1,30}",
        "[0-9]{1,5}|[a-z]{3,10}",
        "[a-zA-Z_][a-zA-Z0-9_]{0,15}",
        "[a-zA-Z0-9]{1,20}",
        "[a-zA-Z_][a-zA-Z0-9_]{0,15}",
        arb_sslmode(),
    )
        .prop_map(
            |(db_host, db_port, db_user, db_password, db_name, db_ssl)| ServiceSettings {
                db_host,
                db_port,
                db_user,
                db_password,
                db_name,
                db_ssl,
            },
        )
}

fn to_config(s: &ServiceSettings) -> ConnectionConfig {
    ConnectionConfig::new(
        s.db_host.clone(),
        s.db_port.clone(),
        s.db_user.clone(),
        s.db_password.clone(),
        s.db_name.clone(),
        s.db_ssl.clone(),
    )
}

proptest! {
    #[test]
    fn from_source_copies_every_field(settings in arb_settings()) {
        let config = ConnectionConfig::from_source(&settings);

        prop_assert_eq!(config.host(), settings.host());
        prop_assert_eq!(config.port(), settings.port());
        prop_assert_eq!(config.user(), settings.user());
        prop_assert_eq!(config.password(), settings.password());
        prop_assert_eq!(config.name(), settings.name());
        prop_assert_eq!(config.sslmode(), settings.sslmode());
    }

    #[test]
    fn connection_string_is_deterministic(settings in arb_settings()) {
        let config = ConnectionConfig::from_source(&settings);
        prop_assert_eq!(config.connection_string(), config.clone().connection_string());
        prop_assert_eq!(
            config.connection_string(),
            ConnectionConfig::from_source(&settings).connection_string()
        );
    }

    #[test]
    fn connection_string_changes_with_any_field(
        settings in arb_settings(),
        field in 0usize..6,
        suffix in "[a-z0-9]{1,5}",
    ) {
        let mut changed = settings.clone();
        match field {
            0 => changed.db_host.push_str(&suffix),
            1 => changed.db_port.push_str(&suffix),
            2 => changed.db_user.push_str(&suffix),
            3 => changed.db_password.push_str(&suffix),
            4 => changed.db_name.push_str(&suffix),
            _ => changed.db_ssl.push_str(&suffix),
        }

        prop_assert_ne!(
            to_config(&settings).connection_string(),
            to_config(&changed).connection_string()
        );
    }

    #[test]
    fn debug_never_contains_password(settings in arb_settings()) {
        // Only meaningful when the password cannot appear by accident elsewhere.
        prop_assume!(settings.db_password.len() >= 4);
        prop_assume!(!settings.db_host.contains(&settings.db_password));
        prop_assume!(!settings.db_port.contains(&settings.db_password));
        prop_assume!(!settings.db_user.contains(&settings.db_password));
        prop_assume!(!settings.db_name.contains(&settings.db_password));
        prop_assume!(!settings.db_ssl.contains(&settings.db_password));
        prop_assume!(!"ConnectionConfig host port user password name sslmode <redacted>"
            .contains(&settings.db_password));

        let config = to_config(&settings);
        let debug_str = format!("{:?}", config);
        prop_assert!(!debug_str.contains(&settings.db_password));
    }
}
