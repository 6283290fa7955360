#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use prefab_index::config::{ConfigFile, RawConfigFile, Settings};
use prefab_index::engine::BuildCoordinator;
use prefab_index::fs::mock::MockFileSystem;

/// Builder for `Settings` to simplify test setup.
pub struct SettingsBuilder {
    raw: RawConfigFile,
}

impl SettingsBuilder {
    pub fn new() -> Self {
        Self {
            raw: RawConfigFile::default(),
        }
    }

    pub fn export_name(mut self, key: &str) -> Self {
        self.raw.settings.export_name = key.to_string();
        self
    }

    pub fn container_root(mut self, root: &str) -> Self {
        self.raw.settings.container_root = root.to_string();
        self
    }

    pub fn script_extension(mut self, ext: &str) -> Self {
        self.raw.settings.script_extension = ext.to_string();
        self
    }

    pub fn include(mut self, pattern: &str) -> Self {
        self.raw.containers.include.push(pattern.to_string());
        self
    }

    pub fn exclude(mut self, pattern: &str) -> Self {
        self.raw.containers.exclude.push(pattern.to_string());
        self
    }

    pub fn build_config(self) -> ConfigFile {
        ConfigFile::try_from(self.raw).expect("Failed to build valid config from builder")
    }

    pub fn build(self, workspace: &Path, fs: &MockFileSystem) -> Settings {
        let cfg = self.build_config();
        Settings::resolve(&cfg, workspace, fs).expect("Failed to resolve settings")
    }
}

impl Default for SettingsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// An in-memory project rooted at `/proj`.
#[derive(Debug, Clone)]
pub struct MockProject {
    pub fs: MockFileSystem,
    pub root: PathBuf,
    key: String,
}

impl MockProject {
    pub fn new() -> Self {
        Self::with_key("ExportName")
    }

    pub fn with_key(key: &str) -> Self {
        let fs = MockFileSystem::new();
        let root = PathBuf::from("/proj");
        // Make sure the root exists even before any container is added.
        fs.add_file(root.join("PrefabIndex.toml"), "");
        Self {
            fs,
            root,
            key: key.to_string(),
        }
    }

    /// Absolute path of `rel` inside the project.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    /// Write a container that references `scripts`, one key line each,
    /// surrounded by some unrelated YAML.
    pub fn container(&self, rel: &str, scripts: &[&str]) -> PathBuf {
        let mut text = String::from("%YAML 1.1\n--- !u!1 &100\nGameObject:\n  m_Name: Root\n");
        for script in scripts {
            text.push_str("--- !u!114 &200\nMonoBehaviour:\n");
            text.push_str(&format!("  {}: {}\n", self.key, script));
        }
        let path = self.path(rel);
        self.fs.add_file(&path, text);
        path
    }

    pub fn remove(&self, rel: &str) -> PathBuf {
        let path = self.path(rel);
        self.fs.remove_file(&path);
        path
    }

    pub fn settings(&self) -> Settings {
        SettingsBuilder::new()
            .export_name(&self.key)
            .build(&self.root, &self.fs)
    }

    pub fn coordinator(&self) -> BuildCoordinator {
        BuildCoordinator::new(self.settings(), Arc::new(self.fs.clone()))
            .expect("Failed to build coordinator")
    }
}

impl Default for MockProject {
    fn default() -> Self {
        Self::new()
    }
}
