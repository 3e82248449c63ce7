//! Configuration types for the research portal.
//!
//! Configuration is read from a single TOML file with two sections:
//!
//! ```toml
//! [server]
//! bind = "0.0.0.0:8080"
//!
//! [audit]
//! enabled = true
//! storage = { backend = "file", file_path = "data/audit.log" }
//! ```
//!
//! Every field has a default, so an empty file is a valid configuration.

pub mod audit;
pub mod server;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub use audit::{ActorConfig, AuditConfig, StorageBackend, StorageConfig};
pub use server::ServerConfig;

/// Complete portal configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortalConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Audit trail settings.
    #[serde(default)]
    pub audit: AuditConfig,
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl PortalConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML content.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}
