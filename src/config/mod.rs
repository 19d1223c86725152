//! Configuration loading and management for the overlap engine service.
//!
//! This module loads the service configuration (listener address, upload
//! limits, log level) from a YAML file. Engine behaviour itself is not
//! configurable.
//!
//! # Example
//!
//! ```no_run
//! use overlap_engine::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config/engine.yaml").unwrap();
//! println!("Upload limit: {} bytes", loader.upload().max_bytes);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    DEFAULT_HOST, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_PORT, EngineConfig, LoggingConfig,
    ServerConfig, UploadConfig,
};
