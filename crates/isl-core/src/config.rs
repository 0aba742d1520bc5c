use crate::error::IslError;
use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;

/// Longest spec accepted from a client, terminator excluded.
pub const DEFAULT_MAX_SPEC_LEN: usize = 80;
/// Longest request line accepted before the connection is dropped.
pub const DEFAULT_MAX_LINE_LEN: usize = 5000;

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Tokio worker threads.
    pub threads: usize,
    pub max_spec_len: usize,
    pub max_line_len: usize,
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 10000,
            threads: num_cpus::get(),
            max_spec_len: DEFAULT_MAX_SPEC_LEN,
            max_line_len: DEFAULT_MAX_LINE_LEN,
            log_filter: "info".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, IslError> {
        let config: ServerConfig =
            toml::from_str(raw).map_err(|e| IslError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a TOML config file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self, IslError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| IslError::Config(format!("{}: {}", path.display(), e)))?;
        let config = Self::from_toml_str(&raw)?;
        tracing::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), IslError> {
        if self.threads == 0 {
            return Err(IslError::Config("threads must be greater than 0".to_string()));
        }
        if self.max_spec_len == 0 {
            return Err(IslError::Config("max_spec_len must be greater than 0".to_string()));
        }
        if self.max_line_len == 0 {
            return Err(IslError::Config("max_line_len must be greater than 0".to_string()));
        }
        self.socket_addr().map(|_| ())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, IslError> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|_| IslError::InvalidAddress(self.host.clone()))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Splits `addr` into host and port and stores both.
    pub fn set_listen(&mut self, addr: SocketAddr) {
        self.host = addr.ip().to_string();
        self.port = addr.port();
    }
}
