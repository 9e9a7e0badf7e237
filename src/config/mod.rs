//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `RERANK_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;

use crate::constants::{DEFAULT_MAX_CONCURRENT_INFERENCES, MAX_SEQ_LEN};

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `RERANK_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8000`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Cross-encoder model directory. `None` runs the stub scorer.
    pub model_path: Option<PathBuf>,

    /// Upper bound on inference calls running at once. Default: `4`.
    pub max_concurrent_inferences: usize,

    /// Token limit per (query, document) pair. Default: `512`, also the maximum.
    pub max_seq_len: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            model_path: None,
            max_concurrent_inferences: DEFAULT_MAX_CONCURRENT_INFERENCES,
            max_seq_len: MAX_SEQ_LEN,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "RERANK_PORT";
    const ENV_BIND_ADDR: &'static str = "RERANK_BIND_ADDR";
    const ENV_MODEL_PATH: &'static str = "RERANK_MODEL_PATH";
    const ENV_MAX_CONCURRENT: &'static str = "RERANK_MAX_CONCURRENT_INFERENCES";
    const ENV_MAX_SEQ_LEN: &'static str = "RERANK_MAX_SEQ_LEN";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let model_path = Self::parse_optional_path_from_env(Self::ENV_MODEL_PATH);
        let max_concurrent_inferences =
            Self::parse_concurrency_from_env(defaults.max_concurrent_inferences)?;
        let max_seq_len = Self::parse_max_seq_len_from_env(defaults.max_seq_len)?;

        Ok(Self {
            port,
            bind_addr,
            model_path,
            max_concurrent_inferences,
            max_seq_len,
        })
    }

    /// Validates paths and limits (does not load the model).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrent_inferences == 0 {
            return Err(ConfigError::InvalidConcurrency {
                value: self.max_concurrent_inferences.to_string(),
            });
        }

        if !(1..=MAX_SEQ_LEN).contains(&self.max_seq_len) {
            return Err(ConfigError::InvalidMaxSeqLen {
                value: self.max_seq_len.to_string(),
            });
        }

        if let Some(ref path) = self.model_path {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        match self.bind_addr {
            IpAddr::V4(addr) => format!("{}:{}", addr, self.port),
            IpAddr::V6(addr) => format!("[{}]:{}", addr, self.port),
        }
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn parse_concurrency_from_env(default: usize) -> Result<usize, ConfigError> {
        match env::var(Self::ENV_MAX_CONCURRENT) {
            Ok(value) => match value.trim().parse::<usize>() {
                Ok(n) if n > 0 => Ok(n),
                _ => Err(ConfigError::InvalidConcurrency { value }),
            },
            Err(_) => Ok(default),
        }
    }

    fn parse_max_seq_len_from_env(default: usize) -> Result<usize, ConfigError> {
        match env::var(Self::ENV_MAX_SEQ_LEN) {
            Ok(value) => match value.trim().parse::<usize>() {
                Ok(n) if (1..=MAX_SEQ_LEN).contains(&n) => Ok(n),
                _ => Err(ConfigError::InvalidMaxSeqLen { value }),
            },
            Err(_) => Ok(default),
        }
    }
}
