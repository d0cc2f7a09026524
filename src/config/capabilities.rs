//! The server capability list a parse runs against, persisted as a JSON
//! array of strings in the user config directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::paths;
use crate::sieve::registry::known_capabilities;

const CAPABILITIES_FILE: &str = "capabilities.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no config directory for this user")]
    NoConfigDir,
    #[error("cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot encode capabilities: {0}")]
    Json(#[from] serde_json::Error),
}

fn capabilities_path() -> Option<PathBuf> {
    paths::config_dir().map(|d| d.join(CAPABILITIES_FILE))
}

pub fn load_capabilities() -> Option<Vec<String>> {
    load_from(&capabilities_path()?)
}

pub fn save_capabilities(capabilities: &[String]) -> Result<PathBuf, ConfigError> {
    let path = capabilities_path().ok_or(ConfigError::NoConfigDir)?;
    save_to(&path, capabilities)?;
    Ok(path)
}

pub fn load_from(path: &Path) -> Option<Vec<String>> {
    let data = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&data) {
        Ok(caps) => Some(caps),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring malformed capabilities file");
            None
        }
    }
}

pub fn save_to(path: &Path, capabilities: &[String]) -> Result<(), ConfigError> {
    let io_err = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let data = serde_json::to_string_pretty(capabilities)?;
    fs::write(path, data).map_err(io_err)
}

/// Explicit capabilities win, then the saved file, then everything the
/// registry knows.
pub fn resolve_capabilities(explicit: &[String]) -> Vec<String> {
    if !explicit.is_empty() {
        return explicit.to_vec();
    }
    if let Some(saved) = load_capabilities() {
        debug!(count = saved.len(), "using saved capabilities");
        return saved;
    }
    known_capabilities().into_iter().map(str::to_string).collect()
}
