//! Process configuration read from the environment.
//!
//! `DB_DSN` is required. `PORT` and `DB_MAX_CONNECTIONS` fall back to
//! defaults. Lookup goes through a closure so tests never touch the real
//! environment.

use std::net::SocketAddr;

use crate::error::ConfigError;
use crate::store::DatabaseConfig;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database: DatabaseConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let dsn = lookup("DB_DSN")
            .filter(|dsn| !dsn.is_empty())
            .ok_or(ConfigError::Missing("DB_DSN"))?;
        let port = parse_or("PORT", lookup("PORT"), DEFAULT_PORT)?;
        let max_connections =
            parse_or("DB_MAX_CONNECTIONS", lookup("DB_MAX_CONNECTIONS"), DEFAULT_MAX_CONNECTIONS)?;
        if max_connections == 0 {
            return Err(ConfigError::Invalid {
                name: "DB_MAX_CONNECTIONS",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            port,
            database: DatabaseConfig {
                dsn,
                max_connections,
            },
        })
    }

    /// Listener address; binds every interface.
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn dsn_is_required() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DB_DSN")));
    }

    #[test]
    fn empty_dsn_counts_as_missing() {
        let err = Config::from_lookup(lookup(&[("DB_DSN", "")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DB_DSN")));
    }

    #[test]
    fn defaults_apply() {
        let config = Config::from_lookup(lookup(&[("DB_DSN", "sqlite::memory:")])).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.database.dsn, "sqlite::memory:");
        assert_eq!(config.database.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(config.listen_addr().to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = Config::from_lookup(lookup(&[
            ("DB_DSN", "mysql://root:pw@localhost:3306/todo"),
            ("PORT", "9090"),
            ("DB_MAX_CONNECTIONS", "3"),
        ]))
        .unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.database.max_connections, 3);
    }

    #[test]
    fn bad_port_is_rejected() {
        let err = Config::from_lookup(lookup(&[("DB_DSN", "sqlite::memory:"), ("PORT", "http")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "PORT", .. }));
    }

    #[test]
    fn zero_pool_size_is_rejected() {
        let err = Config::from_lookup(lookup(&[
            ("DB_DSN", "sqlite::memory:"),
            ("DB_MAX_CONNECTIONS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                name: "DB_MAX_CONNECTIONS",
                ..
            }
        ));
    }
}
