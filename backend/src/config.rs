//! Application configuration.
//!
//! Defaults live here as constants; a `.env` file and the process
//! environment override them, and CLI flags override both.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use tracing::warn;

use crate::error::{ServerError, ServerResult};

/// Source spreadsheet read when nothing else is configured.
pub const DEFAULT_DATA_PATH: &str = "NoFetal2019_BD.xlsx";

/// Listen address.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Listen port.
pub const DEFAULT_PORT: u16 = 8050;

pub const ENV_DATA_PATH: &str = "MORTALITY_DATA";
pub const ENV_HOST: &str = "MORTALITY_HOST";
pub const ENV_PORT: &str = "MORTALITY_PORT";

/// Runtime configuration for the dashboard server.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Spreadsheet or CSV file to load at startup
    pub data_path: PathBuf,
    /// Interface to bind
    pub host: String,
    /// Port to bind
    pub port: u16,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl DashboardConfig {
    /// Read the configuration from the environment (after loading `.env`).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_DATA_PATH).filter(|v| !v.trim().is_empty()) {
            config.data_path = PathBuf::from(path.trim());
        }
        if let Some(host) = lookup(ENV_HOST).filter(|v| !v.trim().is_empty()) {
            config.host = host.trim().to_string();
        }
        if let Some(port) = lookup(ENV_PORT) {
            match port.trim().parse::<u16>() {
                Ok(p) => config.port = p,
                Err(_) => warn!(value = %port, default = DEFAULT_PORT, "invalid {}, using default", ENV_PORT),
            }
        }

        config
    }

    /// Apply CLI overrides.
    pub fn with_overrides(mut self, data: Option<PathBuf>, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(data) = data {
            self.data_path = data;
        }
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    /// Socket address to bind.
    pub fn socket_addr(&self) -> ServerResult<SocketAddr> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|e| ServerError::BadAddress(format!("'{}': {}", self.host, e)))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}
