//! Server configuration from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::cache::CacheConfig;

/// Default listen address.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{name} has invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Settings for the HTTP server binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// JSON schedule snapshot to serve.
    pub snapshot_path: PathBuf,
    pub bind_addr: SocketAddr,
    pub cache: CacheConfig,
}

impl ServerConfig {
    /// Read `SNAPSHOT_PATH`, `BIND_ADDR` and `CACHE_TTL_SECS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let snapshot_path = lookup("SNAPSHOT_PATH")
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .ok_or(ConfigError::Missing("SNAPSHOT_PATH"))?;

        let bind = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind.parse().map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
            name: "BIND_ADDR",
            value: bind.clone(),
            reason: e.to_string(),
        })?;

        let mut cache = CacheConfig::default();
        if let Some(ttl) = lookup("CACHE_TTL_SECS") {
            let secs: u64 = ttl.parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::Invalid {
                    name: "CACHE_TTL_SECS",
                    value: ttl.clone(),
                    reason: e.to_string(),
                }
            })?;
            cache.ttl = Duration::from_secs(secs);
        }

        Ok(Self {
            snapshot_path,
            bind_addr,
            cache,
        })
    }
}
