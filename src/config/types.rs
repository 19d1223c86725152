//! Configuration types for the overlap engine service.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML configuration file. Every field has a
//! default, so a partial file (or none at all) yields a usable config.

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Default bind host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default bind port.
pub const DEFAULT_PORT: u16 = 5000;

/// Default upload size limit in bytes.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10_000_000;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// HTTP listener settings.
    pub server: ServerConfig,
    /// Upload validation settings.
    pub upload: UploadConfig,
    /// Log output settings.
    pub logging: LoggingConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    /// Resolves `host:port` into a socket address.
    ///
    /// # Example
    ///
    /// ```
    /// use overlap_engine::config::ServerConfig;
    ///
    /// let addr = ServerConfig::default().socket_addr().unwrap();
    /// assert_eq!(addr.to_string(), "127.0.0.1:5000");
    /// ```
    pub fn socket_addr(&self) -> EngineResult<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e: std::net::AddrParseError| EngineError::InvalidConfig {
                field: "server.host".to_string(),
                message: format!("'{}' is not a valid address: {}", self.host, e),
            })
    }
}

/// Upload validation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Largest accepted request body.
    pub max_bytes: usize,
    /// File extensions accepted for uploads, without the dot.
    pub allowed_extensions: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            allowed_extensions: vec!["csv".to_string()],
        }
    }
}

impl UploadConfig {
    /// Returns true when `file_name` ends in one of the allowed extensions,
    /// ignoring case.
    pub fn accepts_file_name(&self, file_name: &str) -> bool {
        let lower = file_name.to_lowercase();
        self.allowed_extensions
            .iter()
            .any(|ext| lower.ends_with(&format!(".{}", ext.to_lowercase())))
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset (e.g. `info`).
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.upload.max_bytes, 10_000_000);
        assert_eq!(config.upload.allowed_extensions, vec!["csv"]);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_yaml_falls_back_to_defaults() {
        let config: EngineConfig = serde_yaml::from_str("server:\n  port: 8080\n").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.upload, UploadConfig::default());
    }

    #[test]
    fn test_socket_addr_rejects_bad_host() {
        let server = ServerConfig {
            host: "not a host".to_string(),
            port: 80,
        };
        match server.socket_addr() {
            Err(EngineError::InvalidConfig { field, .. }) => assert_eq!(field, "server.host"),
            other => panic!("Expected InvalidConfig error, got {:?}", other),
        }
    }

    #[test]
    fn test_accepts_file_name_ignores_case() {
        let upload = UploadConfig::default();
        assert!(upload.accepts_file_name("employees.csv"));
        assert!(upload.accepts_file_name("EMPLOYEES.CSV"));
        assert!(!upload.accepts_file_name("employees.xlsx"));
        assert!(!upload.accepts_file_name("csv"));
    }
}
