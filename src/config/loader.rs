//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the service
//! configuration from a YAML file.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{EngineConfig, LoggingConfig, ServerConfig, UploadConfig};

/// Loads and provides access to the service configuration.
///
/// # File Layout
///
/// ```text
/// server:
///   host: 127.0.0.1
///   port: 5000
/// upload:
///   max_bytes: 10000000
///   allowed_extensions: [csv]
/// logging:
///   level: info
/// ```
///
/// # Example
///
/// ```no_run
/// use overlap_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/engine.yaml").unwrap();
/// println!("Listening on port {}", loader.server().port);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified YAML file.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - The file is missing or unreadable
    /// - The file contains invalid YAML
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let config = Self::load_yaml::<EngineConfig>(path.as_ref())?;
        Ok(Self { config })
    }

    /// Built-in defaults, without touching the filesystem.
    pub fn defaults() -> Self {
        Self::default()
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the full configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns a mutable reference, for command-line overrides.
    pub fn config_mut(&mut self) -> &mut EngineConfig {
        &mut self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> EngineConfig {
        self.config
    }

    /// Returns the server settings.
    pub fn server(&self) -> &ServerConfig {
        &self.config.server
    }

    /// Returns the upload settings.
    pub fn upload(&self) -> &UploadConfig {
        &self.config.upload
    }

    /// Returns the logging settings.
    pub fn logging(&self) -> &LoggingConfig {
        &self.config.logging
    }
}
