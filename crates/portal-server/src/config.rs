//! Configuration file loading for the server binary.

use anyhow::Context;
use portal_core::PortalConfig;
use std::path::Path;

/// Read the configuration at `path`.
///
/// Returns `Ok(None)` when the file does not exist so the caller can fall back
/// to defaults. A file that exists but does not parse is an error.
pub fn read_config(path: &Path) -> anyhow::Result<Option<PortalConfig>> {
    if !path.exists() {
        return Ok(None);
    }

    let config = PortalConfig::from_file(path)
        .with_context(|| format!("failed to load config from {}", path.display()))?;
    Ok(Some(config))
}
