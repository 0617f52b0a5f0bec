//! Centralized data directory management for Pojok
//!
//! Directory layout:
//! ```text
//! pojok_data/
//! └── pojok.sqlite     # SQLite database (users, profiles, posts, ...)
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable overriding the data root.
pub const ROOT_ENV: &str = "POJOK_ROOT";

/// Fallback data root, relative to the working directory.
pub const DEFAULT_ROOT: &str = "pojok_data";

/// Database file name inside the data root.
pub const DATABASE_FILE: &str = "pojok.sqlite";

#[derive(Serialize, Deserialize, Debug, Default)]
struct PojokConfig {
    data_root: Option<PathBuf>,
}

/// Get the global configuration path
fn get_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("pojok").join("config.json"))
}

/// Load the persistent root from config file
pub fn load_persistent_root() -> Option<PathBuf> {
    let path = get_config_path()?;
    read_root_file(&path)
}

fn read_root_file(path: &Path) -> Option<PathBuf> {
    if !path.exists() {
        return None;
    }

    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<PojokConfig>(&content) {
            Ok(config) => config.data_root,
            Err(e) => {
                warn!("Failed to parse config file at {:?}: {}", path, e);
                None
            }
        },
        Err(e) => {
            warn!("Failed to read config file at {:?}: {}", path, e);
            None
        }
    }
}

/// Pick the data root: explicit override first, then the persisted root,
/// then [`DEFAULT_ROOT`].
pub fn resolve_root(env_root: Option<String>, persisted: Option<PathBuf>) -> PathBuf {
    if let Some(val) = env_root.filter(|v| !v.trim().is_empty()) {
        return PathBuf::from(val);
    }
    persisted.unwrap_or_else(|| PathBuf::from(DEFAULT_ROOT))
}

/// Get the data root from environment, persistent config, or default
pub fn data_root() -> PathBuf {
    resolve_root(std::env::var(ROOT_ENV).ok(), load_persistent_root())
}

/// Database file path
pub fn database_path() -> PathBuf {
    data_root().join(DATABASE_FILE)
}

/// SQLite connection URL for a database file
pub fn sqlite_url(path: &Path) -> String {
    format!("sqlite://{}", path.to_string_lossy().replace('\\', "/"))
}

/// Ensure a single directory exists
pub fn ensure_dir(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
        info!("Created directory: {:?}", path);
    }
    Ok(())
}

/// Ensure a file's parent directory exists
pub fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }
    Ok(())
}
