// src/config/settings.rs

//! Resolved settings for one workspace session.

use std::path::{Path, PathBuf};

use crate::config::model::ConfigFile;
use crate::errors::{PrefabIndexError, Result};
use crate::fs::FileSystem;

/// Settings fixed for the lifetime of a session.
///
/// The export key is read once here; changing it requires a restart.
#[derive(Debug, Clone)]
pub struct Settings {
    export_key: String,
    workspace_root: PathBuf,
    container_root: PathBuf,
    root_is_workspace: bool,
    script_extension: String,
    include: Vec<String>,
    exclude: Vec<String>,
}

impl Settings {
    /// Resolve a validated config against `workspace`.
    ///
    /// Relative container roots are joined onto the workspace root. Both
    /// roots are canonicalized when possible so that watcher paths and
    /// scanned paths agree.
    pub fn resolve(cfg: &ConfigFile, workspace: &Path, fs: &dyn FileSystem) -> Result<Self> {
        let workspace_root = fs
            .canonicalize(workspace)
            .unwrap_or_else(|_| workspace.to_path_buf());

        let raw_root = cfg.settings().container_root.trim();
        let root_is_workspace = raw_root.is_empty();
        let container_root = if root_is_workspace {
            workspace_root.clone()
        } else {
            let candidate = workspace_root.join(raw_root);
            if !fs.is_dir(&candidate) {
                return Err(PrefabIndexError::ConfigError(format!(
                    "[settings].container_root {:?} is not a directory",
                    candidate
                )));
            }
            fs.canonicalize(&candidate).unwrap_or(candidate)
        };

        Ok(Self {
            export_key: cfg.settings().export_key().to_string(),
            workspace_root,
            container_root,
            root_is_workspace,
            script_extension: cfg.settings().script_extension().to_string(),
            include: cfg.containers().include.clone(),
            exclude: cfg.containers().exclude.clone(),
        })
    }

    /// Key used by the extractor pattern, e.g. `ExportName`.
    pub fn export_key(&self) -> &str {
        &self.export_key
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    /// Directory scanned for containers.
    pub fn container_root(&self) -> &Path {
        &self.container_root
    }

    pub fn container_root_is_workspace(&self) -> bool {
        self.root_is_workspace
    }

    /// Extension of queryable script files, without the dot.
    pub fn script_extension(&self) -> &str {
        &self.script_extension
    }

    pub fn include_patterns(&self) -> &[String] {
        &self.include
    }

    pub fn exclude_patterns(&self) -> &[String] {
        &self.exclude
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RawConfigFile;
    use crate::fs::mock::MockFileSystem;

    #[test]
    fn empty_root_means_workspace() {
        let fs = MockFileSystem::new();
        let cfg = ConfigFile::try_from(RawConfigFile::default()).unwrap();
        let settings = Settings::resolve(&cfg, Path::new("/proj"), &fs).unwrap();
        assert!(settings.container_root_is_workspace());
        assert_eq!(settings.container_root(), Path::new("/proj"));
    }

    #[test]
    fn relative_root_is_joined_onto_workspace() {
        let fs = MockFileSystem::new();
        fs.add_file("/proj/assets/a.prefab", "");
        let raw = RawConfigFile::default().with_overrides(None, Some("assets".to_string()));
        let cfg = ConfigFile::try_from(raw).unwrap();
        let settings = Settings::resolve(&cfg, Path::new("/proj"), &fs).unwrap();
        assert!(!settings.container_root_is_workspace());
        assert_eq!(settings.container_root(), Path::new("/proj/assets"));
    }

    #[test]
    fn missing_root_is_a_config_error() {
        let fs = MockFileSystem::new();
        let raw = RawConfigFile::default().with_overrides(None, Some("nope".to_string()));
        let cfg = ConfigFile::try_from(raw).unwrap();
        assert!(matches!(
            Settings::resolve(&cfg, Path::new("/proj"), &fs),
            Err(PrefabIndexError::ConfigError(_))
        ));
    }
}
