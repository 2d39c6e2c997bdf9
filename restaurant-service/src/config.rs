use std::{env, net::SocketAddr};

use dotenvy::dotenv;

use crate::error::ConfigError;

pub const DEFAULT_DATABASE_URL: &str = "restaurants.sqlite";
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";
pub const DEFAULT_POOL_SIZE: u32 = 5;

/// Runtime settings, read from the environment (and `.env` when present).
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// SQLite file path, or `:memory:` for a throwaway database
    pub database_url: String,
    pub bind_address: SocketAddr,
    pub pool_size: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        let bind_address = env::var("BIND_ADDRESS")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string())
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                name: "BIND_ADDRESS",
                value: e.to_string(),
            })?;
        let pool_size = match env::var("DATABASE_POOL_SIZE") {
            Ok(value) => parse_pool_size(&value)?,
            Err(_) => DEFAULT_POOL_SIZE,
        };

        Ok(Self {
            database_url,
            bind_address,
            pool_size,
        })
    }

    /// Single-connection in-memory database; each call gets a fresh store.
    pub fn in_memory() -> Self {
        Self {
            database_url: ":memory:".to_string(),
            ..Self::default()
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_url == ":memory:" || self.database_url.contains("mode=memory")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            bind_address: SocketAddr::from(([0, 0, 0, 0], 3000)),
            pool_size: DEFAULT_POOL_SIZE,
        }
    }
}

fn parse_pool_size(value: &str) -> Result<u32, ConfigError> {
    match value.trim().parse::<u32>() {
        Ok(size) if size > 0 => Ok(size),
        _ => Err(ConfigError::Invalid {
            name: "DATABASE_POOL_SIZE",
            value: value.to_string(),
        }),
    }
}
