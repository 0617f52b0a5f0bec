//! Server configuration

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use anyhow::Context;

use crate::auth::password::{MAX_COST, MIN_COST};
use crate::db::Db;

/// Configuration for the Pojok server
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// SQLite connection URL
    pub database_url: String,
    /// Pool size
    pub max_connections: u32,
    /// bcrypt cost factor, between [`MIN_COST`] and [`MAX_COST`]
    pub bcrypt_cost: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 3000,
            database_url: pojok_common::sqlite_url(&pojok_common::database_path()),
            max_connections: 5,
            bcrypt_cost: MIN_COST,
        }
    }
}

impl ServerConfig {
    /// Defaults overridden by `HOST`, `PORT`, `DATABASE_URL`,
    /// `DB_MAX_CONNECTIONS` and `BCRYPT_COST`.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("HOST") {
            config.host = host
                .parse()
                .with_context(|| format!("HOST is not an IP address: {host}"))?;
        }
        if let Some(port) = lookup("PORT") {
            config.port = port
                .parse()
                .with_context(|| format!("PORT is not a valid port: {port}"))?;
        }
        if let Some(url) = lookup("DATABASE_URL").filter(|u| !u.trim().is_empty()) {
            config.database_url = url;
        }
        if let Some(max) = lookup("DB_MAX_CONNECTIONS") {
            config.max_connections = max
                .parse()
                .with_context(|| format!("DB_MAX_CONNECTIONS is not a number: {max}"))?;
        }
        if let Some(cost) = lookup("BCRYPT_COST") {
            let cost: u32 = cost
                .parse()
                .with_context(|| format!("BCRYPT_COST is not a number: {cost}"))?;
            if cost > MAX_COST {
                anyhow::bail!("BCRYPT_COST must be at most {MAX_COST}, got {cost}");
            }
            config.bcrypt_cost = cost.max(MIN_COST);
        }

        Ok(config)
    }

    /// Config backed by a database file at `path`, used by tests and tools.
    pub fn with_database(path: impl Into<PathBuf>) -> Self {
        Self {
            database_url: pojok_common::sqlite_url(&path.into()),
            ..Self::default()
        }
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Local file behind `database_url`, if it names one.
    pub fn database_file(&self) -> Option<PathBuf> {
        let path = self
            .database_url
            .strip_prefix("sqlite://")
            .or_else(|| self.database_url.strip_prefix("sqlite:"))?;
        let path = path.split('?').next().unwrap_or(path);
        if path.is_empty() || path.starts_with(":memory:") {
            None
        } else {
            Some(PathBuf::from(path))
        }
    }
}

/// App state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: ServerConfig,
    pub db: Db,
}

impl AppState {
    pub fn new(config: ServerConfig, db: Db) -> Self {
        Self { config, db }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.bcrypt_cost, 10);
        assert!(config.database_url.ends_with("pojok.sqlite"));
        assert_eq!(config.addr().to_string(), "0.0.0.0:3000");
    }

    #[test]
    fn test_env_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("PORT", "8081"),
            ("HOST", "127.0.0.1"),
            ("DATABASE_URL", "sqlite:///tmp/other.sqlite?mode=rwc"),
            ("BCRYPT_COST", "4"),
        ]))
        .unwrap();

        assert_eq!(config.addr().to_string(), "127.0.0.1:8081");
        assert_eq!(config.bcrypt_cost, MIN_COST);
        assert_eq!(config.database_file(), Some(PathBuf::from("/tmp/other.sqlite")));
    }

    #[test]
    fn test_invalid_port_is_an_error() {
        assert!(ServerConfig::from_lookup(lookup(&[("PORT", "eighty")])).is_err());
    }

    #[test]
    fn test_invalid_cost_is_an_error() {
        let err = ServerConfig::from_lookup(lookup(&[("BCRYPT_COST", "40")])).unwrap_err();
        assert!(err.to_string().contains("BCRYPT_COST"));
        assert!(ServerConfig::from_lookup(lookup(&[("BCRYPT_COST", "ten")])).is_err());

        let config = ServerConfig::from_lookup(lookup(&[("BCRYPT_COST", "31")])).unwrap();
        assert_eq!(config.bcrypt_cost, MAX_COST);
    }

    #[test]
    fn test_memory_database_has_no_file() {
        let config = ServerConfig {
            database_url: "sqlite::memory:".to_string(),
            ..ServerConfig::default()
        };
        assert_eq!(config.database_file(), None);
    }
}
