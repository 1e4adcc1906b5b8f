use std::env;
use std::net::SocketAddr;
use anyhow::{Context, Result};

/// Which persistence backend sessions are stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    /// PostgreSQL through a deadpool connection pool.
    Postgres,
    /// A process-local map. Sessions are lost on restart.
    Memory,
}

/// The application's configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// The URL of the PostgreSQL database. `None` only for the memory store.
    pub database_url: Option<String>,
    /// Maximum number of pooled database connections.
    pub db_pool_max_size: usize,
    /// The address the HTTP server listens on.
    pub bind_addr: SocketAddr,
    /// Allowed CORS origins. `None` allows any origin.
    pub cors_allowed_origins: Option<Vec<String>>,
    /// Seconds by which a session may be resolved ahead of its scheduled moment.
    pub resolve_grace_secs: i64,
    /// The session store backend.
    pub store: StoreKind,
}

impl Config {
    /// Creates a new `Config` from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Creates a new `Config` from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let store = match var("SESSION_STORE").as_deref() {
            None | Some("postgres") => StoreKind::Postgres,
            Some("memory") => StoreKind::Memory,
            Some(other) => anyhow::bail!(
                "SESSION_STORE must be 'postgres' or 'memory', got '{}'",
                other
            ),
        };

        let database_url = match var("DATABASE_URL") {
            Some(url) => Some(url),
            None => match var("DB_HOST") {
                Some(host) => Some(format!(
                    "host={} port={} user={} password={} dbname={} sslmode=disable",
                    host,
                    var("DB_PORT").unwrap_or_else(|| "5432".to_string()),
                    var("DB_USER").unwrap_or_default(),
                    var("DB_PASSWORD").unwrap_or_default(),
                    var("DB_NAME").unwrap_or_default(),
                )),
                None => None,
            },
        };

        if store == StoreKind::Postgres && database_url.is_none() {
            anyhow::bail!("DATABASE_URL or DB_HOST must be set when SESSION_STORE=postgres");
        }

        let resolve_grace_secs: i64 = var("RESOLVE_GRACE_SECS")
            .unwrap_or_else(|| "0".to_string())
            .parse()
            .context("Invalid RESOLVE_GRACE_SECS")?;
        if resolve_grace_secs < 0 {
            anyhow::bail!("RESOLVE_GRACE_SECS must not be negative");
        }

        Ok(Self {
            database_url,
            db_pool_max_size: var("DB_POOL_MAX_SIZE")
                .unwrap_or_else(|| "16".to_string())
                .parse()
                .context("Invalid DB_POOL_MAX_SIZE")?,
            bind_addr: var("BIND_ADDR")
                .unwrap_or_else(|| "0.0.0.0:8080".to_string())
                .parse()
                .context("Invalid BIND_ADDR")?,
            cors_allowed_origins: var("CORS_ALLOWED_ORIGINS").map(|list| {
                list.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            }),
            resolve_grace_secs,
            store,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_with_database_url() {
        let config = config_from(&[("DATABASE_URL", "postgres://u:p@localhost/coin")]).unwrap();
        assert_eq!(config.database_url.as_deref(), Some("postgres://u:p@localhost/coin"));
        assert_eq!(config.bind_addr, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.db_pool_max_size, 16);
        assert_eq!(config.resolve_grace_secs, 0);
        assert_eq!(config.store, StoreKind::Postgres);
        assert!(config.cors_allowed_origins.is_none());
    }

    #[test]
    fn test_database_url_assembled_from_parts() {
        let config = config_from(&[
            ("DB_HOST", "db"),
            ("DB_USER", "coin"),
            ("DB_PASSWORD", "secret"),
            ("DB_NAME", "flips"),
        ])
        .unwrap();
        assert_eq!(
            config.database_url.as_deref(),
            Some("host=db port=5432 user=coin password=secret dbname=flips sslmode=disable")
        );
    }

    #[test]
    fn test_postgres_requires_connection_settings() {
        assert!(config_from(&[]).is_err());
    }

    #[test]
    fn test_memory_store_needs_no_database() {
        let config = config_from(&[("SESSION_STORE", "memory")]).unwrap();
        assert_eq!(config.store, StoreKind::Memory);
        assert!(config.database_url.is_none());
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(config_from(&[("SESSION_STORE", "redis")]).is_err());
        assert!(config_from(&[("SESSION_STORE", "memory"), ("RESOLVE_GRACE_SECS", "-1")]).is_err());
        assert!(config_from(&[("SESSION_STORE", "memory"), ("BIND_ADDR", "nowhere")]).is_err());
    }

    #[test]
    fn test_cors_origins_split() {
        let config = config_from(&[
            ("SESSION_STORE", "memory"),
            ("CORS_ALLOWED_ORIGINS", "http://localhost:3000, https://flip.example ,"),
        ])
        .unwrap();
        assert_eq!(
            config.cors_allowed_origins,
            Some(vec![
                "http://localhost:3000".to_string(),
                "https://flip.example".to_string()
            ])
        );
    }
}
