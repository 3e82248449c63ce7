//! Audit trail configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Whether audit entries are recorded at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Storage backend configuration.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Actor recorded when a request carries no identity.
    #[serde(default)]
    pub default_actor: ActorConfig,

    /// Number of entries returned by a recency query when no limit is given.
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,

    /// Maximum length of the `details` text, in characters.
    #[serde(default = "default_details_max_len")]
    pub details_max_len: usize,
}

/// Storage backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage backend type.
    #[serde(default)]
    pub backend: StorageBackend,

    /// File path (for the file backend).
    #[serde(default = "default_file_path")]
    pub file_path: String,
}

/// Storage backend type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Keep entries in process memory.
    #[default]
    Memory,
    /// Append entries to a JSON Lines file.
    File,
    /// Discard entries.
    None,
}

/// Identity used for entries recorded without a request actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorConfig {
    #[serde(default = "default_actor_id")]
    pub id: String,
    #[serde(default = "default_actor_name")]
    pub name: String,
    #[serde(default = "default_actor_role")]
    pub role: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            storage: StorageConfig::default(),
            default_actor: ActorConfig::default(),
            recent_limit: default_recent_limit(),
            details_max_len: default_details_max_len(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            file_path: default_file_path(),
        }
    }
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            id: default_actor_id(),
            name: default_actor_name(),
            role: default_actor_role(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_recent_limit() -> usize {
    50
}

fn default_details_max_len() -> usize {
    2000
}

fn default_file_path() -> String {
    "data/audit.log".to_string()
}

fn default_actor_id() -> String {
    "system".to_string()
}

fn default_actor_name() -> String {
    "System Administrator".to_string()
}

fn default_actor_role() -> String {
    "ADMIN".to_string()
}
