// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// File name looked up in the workspace root when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "PrefabIndex.toml";

/// Load a settings file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; use [`load_and_validate`] for the
/// checks.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a settings file from path and run validation.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Resolve the raw settings for a workspace.
///
/// - An explicit path must exist.
/// - Otherwise `PrefabIndex.toml` in the workspace root is used if present,
///   and built-in defaults if not.
pub fn load_for_workspace(workspace: &Path, explicit: Option<&Path>) -> Result<RawConfigFile> {
    if let Some(path) = explicit {
        return load_from_path(path);
    }

    let path = default_config_path(workspace);
    if path.is_file() {
        load_from_path(&path)
    } else {
        debug!(?path, "no settings file; using defaults");
        Ok(RawConfigFile::default())
    }
}

pub fn default_config_path(workspace: &Path) -> PathBuf {
    workspace.join(DEFAULT_CONFIG_FILE)
}
