//! Runtime configuration from the environment (and `.env` via dotenvy)

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{anyhow, Context};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_CACHE_REFRESH_SECS: u64 = 10 * 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    pub run_migrations: bool,
    pub cache_refresh: Duration,
}

impl Config {
    /// Load `.env` if present, then read the process environment
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| anyhow!("DATABASE_URL must be set"))?;

        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("BIND_ADDR must be a socket address like 0.0.0.0:3000")?;

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(v) => v
                .parse::<u32>()
                .context("DATABASE_MAX_CONNECTIONS must be a positive integer")?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let run_migrations = match lookup("RUN_MIGRATIONS") {
            Some(v) => parse_flag(&v)
                .ok_or_else(|| anyhow!("RUN_MIGRATIONS must be true or false, got {v:?}"))?,
            None => true,
        };

        let cache_refresh_secs = match lookup("CACHE_REFRESH_SECS") {
            Some(v) => v
                .parse::<u64>()
                .context("CACHE_REFRESH_SECS must be a number of seconds")?,
            None => DEFAULT_CACHE_REFRESH_SECS,
        };

        Ok(Self {
            database_url,
            bind_addr,
            max_connections: max_connections.max(1),
            run_migrations,
            cache_refresh: Duration::from_secs(cache_refresh_secs.max(1)),
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
