//! Client configuration
//!
//! Config file location: ~/.config/vectordb/client.toml
//!
//! Example config:
//! ```toml
//! address = "db.internal:50051"
//! use_tls = true
//! cert_file = "/etc/vectordb/ca.pem"  # omit to use the system trust store
//! timeout_ms = 1500
//! connect_timeout_secs = 10
//! batch_buffer = 64
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Connection settings for one client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Server address (host:port)
    #[serde(default = "default_address")]
    pub address: String,

    /// Whether to use TLS encryption
    #[serde(default)]
    pub use_tls: bool,

    /// PEM CA certificate for TLS; the system trust store is used when unset
    #[serde(default)]
    pub cert_file: Option<PathBuf>,

    /// Per-request deadline in milliseconds; unset leaves the transport
    /// default in place
    #[serde(default)]
    pub timeout_ms: Option<u64>,

    /// Timeout for establishing the connection
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Number of batch insert messages buffered ahead of the stream
    #[serde(default = "default_batch_buffer")]
    pub batch_buffer: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            use_tls: false,
            cert_file: None,
            timeout_ms: None,
            connect_timeout_secs: default_connect_timeout_secs(),
            batch_buffer: default_batch_buffer(),
        }
    }
}

fn default_address() -> String {
    "localhost:50051".to_string()
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_batch_buffer() -> usize {
    64
}

impl ClientConfig {
    /// Plaintext config for the given address
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Self::default()
        }
    }

    /// Enable TLS, trusting the system roots
    pub fn with_tls(mut self) -> Self {
        self.use_tls = true;
        self
    }

    /// Enable TLS, trusting the CA certificate at `path`
    pub fn with_cert_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.use_tls = true;
        self.cert_file = Some(path.into());
        self
    }

    /// Per-request deadline, kept to millisecond precision
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vectordb")
            .join("client.toml")
    }

    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::Configuration(format!("invalid client config: {}", e)))
    }

    /// Read and parse a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Configuration(format!("failed to read config {:?}: {}", path, e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Load config from the default location, returning defaults if not found
    pub fn load() -> Self {
        let path = Self::config_path();
        if path.exists() {
            match Self::from_file(&path) {
                Ok(config) => {
                    tracing::debug!("Loaded client config from {:?}", path);
                    return config;
                }
                Err(e) => {
                    tracing::warn!("Ignoring client config: {}", e);
                }
            }
        }
        Self::default()
    }
}
