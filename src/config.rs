//! Server configuration loaded from the environment.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};

/// Which store implementation backs the handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    #[default]
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(anyhow!(
                "Unknown STORE_BACKEND '{}'. Must be 'postgres' or 'memory'",
                other
            )),
        }
    }
}

/// HTTP server settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub backend: StoreBackend,
    /// Log filter used when RUST_LOG is not set
    pub log_filter: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 4000,
            backend: StoreBackend::default(),
            log_filter: "qaforum=debug,tower_http=debug".to_string(),
        }
    }
}

impl ServerConfig {
    /// Loads the configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let backend = match std::env::var("STORE_BACKEND") {
            Ok(value) => value.parse::<StoreBackend>().context("Invalid store backend")?,
            Err(_) => defaults.backend,
        };

        Ok(Self {
            host: std::env::var("SERVER_HOST")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.host),
            port: std::env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            backend,
            log_filter: std::env::var("QAFORUM_LOG").unwrap_or(defaults.log_filter),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
